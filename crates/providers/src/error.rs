//! Error types for the provider layer

use thiserror::Error;

/// Result type alias for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Provider errors
///
/// These never reach the proximity core: the aggregator turns every one of
/// them into an empty batch.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider returned an error response
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// All retry attempts exhausted
    #[error("All {attempts} retry attempts failed: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Last error message
        last_error: String,
    },

    /// Provider did not answer in time
    #[error("Provider timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Client could not be configured
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProviderError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            Self::ApiResponse { status, .. } => *status >= 500 || *status == 429,
            Self::Timeout(_) => true,
            Self::Json(_) | Self::RetriesExhausted { .. } | Self::Config(_) => false,
        }
    }
}

impl From<ProviderError> for annaseva_core::Error {
    fn from(err: ProviderError) -> Self {
        annaseva_core::Error::new(annaseva_core::ErrorCode::ProviderError, err.to_string())
            .with_source(err)
    }
}

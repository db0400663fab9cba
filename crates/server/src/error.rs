use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("No route for {0}")]
    NotFound(String),

    #[error(transparent)]
    Config(#[from] annaseva_core::Error),

    #[error("Provider setup failed: {0}")]
    Provider(#[from] annaseva_providers::ProviderError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Config(_)
            | ServerError::Provider(_)
            | ServerError::Bind { .. }
            | ServerError::Serve(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl From<ServerError> for annaseva_core::Error {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::Config(inner) => inner,
            ServerError::Bind { address, source } => annaseva_core::Error::from(source)
                .with_context(format!("While binding {address}"))
                .with_suggestion("Set PORT or [server].port to a free port"),
            other => annaseva_core::Error::new(annaseva_core::ErrorCode::Internal, other.to_string()),
        }
    }
}

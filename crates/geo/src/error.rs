//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
///
/// The proximity operations themselves never fail; these surface only from
/// strict constructors and the JSON-facing WASM bindings.
#[derive(Debug, Error)]
pub enum GeoError {
    /// Invalid WKT format
    #[error("Invalid WKT format: {0}")]
    InvalidWkt(String),

    /// Invalid coordinate values
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Invalid distance (radius or threshold)
    #[error("Invalid distance: {0} km")]
    InvalidDistance(f64),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Error code for integration with annaseva-core error handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Invalid WKT format
    InvalidWkt = 10001,
    /// Invalid coordinate values
    InvalidCoordinate = 10002,
    /// JSON parsing error
    JsonParsing = 10003,
    /// Invalid radius or threshold
    InvalidDistance = 10004,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::InvalidWkt(_) => GeoErrorCode::InvalidWkt,
            GeoError::InvalidCoordinate(_) => GeoErrorCode::InvalidCoordinate,
            GeoError::InvalidDistance(_) => GeoErrorCode::InvalidDistance,
            GeoError::JsonError(_) => GeoErrorCode::JsonParsing,
        }
    }
}

/// Validates a radius or threshold: finite and strictly positive.
pub fn check_distance(km: f64) -> Result<f64> {
    if km.is_finite() && km > 0.0 {
        Ok(km)
    } else {
        Err(GeoError::InvalidDistance(km))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(GeoError::InvalidWkt("x".into()).code() as u32, 10001);
        assert_eq!(GeoError::InvalidDistance(-1.0).code() as u32, 10004);
    }

    #[test]
    fn test_check_distance() {
        assert!(check_distance(0.1).is_ok());
        assert!(check_distance(0.0).is_err());
        assert!(check_distance(f64::NAN).is_err());
        assert!(check_distance(f64::INFINITY).is_err());
    }
}

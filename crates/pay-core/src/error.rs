//! # Payment Error Types
//!
//! Typed error handling for the payment service.
//! All payment operations return `Result<T, PaymentError>`.
//!
//! A signature that does not match is *not* an error: verification returns
//! `Ok(false)` and the HTTP layer decides how to answer.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A required field was absent or empty
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Amount missing, non-numeric or not positive
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Payment gateway API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with the gateway
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns true if the caller can fix this by re-submitting the request
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PaymentError::MissingField { .. }
                | PaymentError::InvalidRequest(_)
                | PaymentError::InvalidAmount(_)
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::MissingField { .. } => 400,
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::InvalidAmount(_) => 400,
            PaymentError::ProviderError { .. } => 502,
            PaymentError::NetworkError(_) => 503,
            PaymentError::Internal(_) => 500,
            PaymentError::Serialization(_) => 500,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

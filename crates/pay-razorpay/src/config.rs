//! # Razorpay Configuration
//!
//! Configuration management for the Razorpay integration.
//! All secrets are loaded from environment variables.

use pay_core::{PaymentError, PaymentResult, SignatureVerifier};
use secrecy::{ExposeSecret, SecretString};
use std::env;

/// Production API base URL
pub const RAZORPAY_API_BASE_URL: &str = "https://api.razorpay.com";

/// Razorpay API configuration
#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    /// Public key id (rzp_test_... or rzp_live_...)
    pub key_id: String,

    /// Key secret. Authenticates API calls and keys payment signatures.
    pub key_secret: SecretString,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,
}

fn required_var(name: &str) -> PaymentResult<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(PaymentError::Configuration(format!("{} not set", name))),
    }
}

impl RazorpayConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `RAZORPAY_KEY_ID`
    /// - `RAZORPAY_KEY_SECRET`
    pub fn from_env() -> PaymentResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let key_id = required_var("RAZORPAY_KEY_ID")?;
        let key_secret = required_var("RAZORPAY_KEY_SECRET")?;

        if !key_id.starts_with("rzp_test_") && !key_id.starts_with("rzp_live_") {
            return Err(PaymentError::Configuration(
                "RAZORPAY_KEY_ID must start with rzp_test_ or rzp_live_".to_string(),
            ));
        }

        Ok(Self::new(key_id, key_secret))
    }

    /// Create config with explicit values (for testing)
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: SecretString::new(key_secret.into()),
            api_base_url: RAZORPAY_API_BASE_URL.to_string(),
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.key_id.starts_with("rzp_test_")
    }

    /// Check if using live keys
    pub fn is_live_mode(&self) -> bool {
        self.key_id.starts_with("rzp_live_")
    }

    /// "test", "live", or "unknown" for a key id with neither prefix
    pub fn mode(&self) -> &'static str {
        if self.is_live_mode() {
            "live"
        } else if self.is_test_mode() {
            "test"
        } else {
            "unknown"
        }
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Build the payment signature verifier keyed with this account's secret
    pub fn verifier(&self) -> PaymentResult<SignatureVerifier> {
        SignatureVerifier::from_secret(self.key_secret.clone())
    }

    pub(crate) fn expose_key_secret(&self) -> &str {
        self.key_secret.expose_secret()
    }
}

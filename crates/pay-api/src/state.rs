//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the payment gateway, the signature verifier, and configuration.

use pay_core::{BoxedPaymentGateway, SignatureVerifier};
use pay_razorpay::{RazorpayConfig, RazorpayGateway};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment gateway (orders and payments)
    pub gateway: BoxedPaymentGateway,
    /// Payment signature verifier, keyed at startup
    pub verifier: Arc<SignatureVerifier>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by Razorpay, configured from the environment
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let razorpay = RazorpayConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load Razorpay config: {}", e))?;

        if razorpay.is_live_mode() && !config.is_production() {
            warn!(
                environment = %config.environment,
                "Razorpay live keys in a non-production environment"
            );
        }
        info!(mode = razorpay.mode(), key_id = %razorpay.key_id, "Razorpay configured");

        let verifier = razorpay
            .verifier()
            .map_err(|e| anyhow::anyhow!("Failed to initialize signature verifier: {}", e))?;
        let gateway = RazorpayGateway::new(razorpay)
            .map_err(|e| anyhow::anyhow!("Failed to initialize Razorpay: {}", e))?;

        Ok(Self::with_gateway(config, Arc::new(gateway), verifier))
    }

    /// Assemble state from explicit parts (tests, alternative gateways)
    pub fn with_gateway(
        config: AppConfig,
        gateway: BoxedPaymentGateway,
        verifier: SignatureVerifier,
    ) -> Self {
        Self {
            gateway,
            verifier: Arc::new(verifier),
            config,
        }
    }
}

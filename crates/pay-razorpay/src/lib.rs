//! # pay-razorpay
//!
//! Razorpay gateway for the payment service.
//!
//! - **RazorpayGateway** - Orders API (create, fetch) and Payments API (fetch)
//! - **RazorpayConfig** - key id / key secret from the environment
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_razorpay::{RazorpayConfig, RazorpayGateway};
//! use pay_core::PaymentGateway;
//!
//! let config = RazorpayConfig::from_env()?;
//! let verifier = config.verifier()?;
//! let gateway = RazorpayGateway::new(config)?;
//!
//! let order = gateway.create_order(&options).await?;
//! // Hand order.id and gateway.key_id() to the browser checkout.
//! // When it returns, check the signature:
//! let authentic = verifier.verify(&request);
//! ```

pub mod client;
pub mod config;

// Re-exports
pub use client::RazorpayGateway;
pub use config::{RazorpayConfig, RAZORPAY_API_BASE_URL};

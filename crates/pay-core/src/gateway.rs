//! # Payment Gateway Trait
//!
//! Abstraction over the payment gateway's order and payment APIs.
//! Implementations: Razorpay (`pay-razorpay`), in-memory fakes for tests.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PaymentGateway (trait)                   │
//! │  ├── create_order()                                         │
//! │  ├── fetch_order()                                          │
//! │  ├── fetch_payment()                                        │
//! │  └── provider_name() / key_id()                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Signature verification lives in [`crate::signature`].

use crate::error::PaymentResult;
use crate::order::{GatewayOrder, GatewayPayment, OrderOptions};
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for payment gateway implementations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an order the browser checkout can be opened against.
    async fn create_order(&self, options: &OrderOptions) -> PaymentResult<GatewayOrder>;

    /// Fetch an order by its gateway id.
    async fn fetch_order(&self, order_id: &str) -> PaymentResult<GatewayOrder>;

    /// Fetch a payment by its gateway id.
    async fn fetch_payment(&self, payment_id: &str) -> PaymentResult<GatewayPayment>;

    /// Get the provider name (for logging and error reporting).
    fn provider_name(&self) -> &'static str;

    /// Public key id handed to the browser checkout. Never the secret.
    fn key_id(&self) -> &str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;

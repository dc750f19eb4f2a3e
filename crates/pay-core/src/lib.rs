//! # pay-core
//!
//! Core types and traits for the payment service.
//!
//! This crate provides:
//! - `SignatureVerifier` and `verify_signature` for checking gateway payment signatures
//! - `PaymentGateway` trait for order creation and record lookup
//! - `CreateOrderRequest`, `OrderOptions`, `GatewayOrder`, `GatewayPayment`
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust
//! use pay_core::{SignatureVerifier, VerificationRequest};
//!
//! let verifier = SignatureVerifier::new("whsec_test").unwrap();
//! let signature = verifier.sign("order_ABC123", "pay_XYZ789");
//!
//! let request = VerificationRequest::new("order_ABC123", "pay_XYZ789", signature).unwrap();
//! assert!(verifier.verify(&request));
//! ```

pub mod error;
pub mod gateway;
pub mod order;
pub mod signature;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use gateway::{BoxedPaymentGateway, PaymentGateway};
pub use order::{
    validate_gateway_id, AmountInput, CreateOrderRequest, GatewayOrder, GatewayPayment,
    OrderNotes, OrderOptions, ReceiptPrefix,
};
pub use signature::{
    canonical_message, compute_signature, verify_signature, SignatureVerifier,
    VerificationRequest,
};

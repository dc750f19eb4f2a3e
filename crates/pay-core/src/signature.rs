//! # Payment Signature Verification
//!
//! After a browser checkout completes, the gateway hands the client an order
//! id, a payment id and a signature. The signature is an HMAC-SHA256 over the
//! canonical message `"{order_id}|{payment_id}"`, keyed with the merchant's
//! key secret and hex encoded. Recomputing it proves the gateway (the only
//! other holder of the secret) issued that exact pairing.
//!
//! ```text
//!   order_id ─┐
//!             ├─ "order_id|payment_id" ─ HMAC-SHA256(secret) ─ hex ─┐
//! payment_id ─┘                                                     ├─ ct_eq ─ bool
//!                                                signature (hex) ───┘
//! ```
//!
//! Everything here is pure: no I/O, no logging, no shared mutable state.

use crate::error::{PaymentError, PaymentResult};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Separator between the two identifiers in the canonical message
pub const SIGNATURE_SEPARATOR: char = '|';

/// Build the canonical message `order_id|payment_id`.
///
/// Order matters: the gateway signs the order id first.
pub fn canonical_message(order_id: &str, payment_id: &str) -> String {
    let mut message = String::with_capacity(order_id.len() + payment_id.len() + 1);
    message.push_str(order_id);
    message.push(SIGNATURE_SEPARATOR);
    message.push_str(payment_id);
    message
}

/// Compute the lowercase hex HMAC-SHA256 signature for an order/payment pair.
pub fn compute_signature(secret: &[u8], order_id: &str, payment_id: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(canonical_message(order_id, payment_id).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a signature in one call.
///
/// Fails with [`PaymentError::MissingField`] if any input is empty, before
/// any hashing happens. A mismatch is `Ok(false)`, not an error.
pub fn verify_signature(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    secret: &str,
) -> PaymentResult<bool> {
    let request = VerificationRequest::new(order_id, payment_id, signature)?;
    let verifier = SignatureVerifier::new(secret)?;
    Ok(verifier.verify(&request))
}

fn require(field: &'static str, value: Option<String>) -> PaymentResult<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(PaymentError::MissingField { field }),
    }
}

/// A validated verification request. Built once per incoming call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    order_id: String,
    payment_id: String,
    signature: String,
}

impl VerificationRequest {
    /// Create a request, rejecting empty fields
    pub fn new(
        order_id: impl Into<String>,
        payment_id: impl Into<String>,
        signature: impl Into<String>,
    ) -> PaymentResult<Self> {
        Self::from_parts(
            Some(order_id.into()),
            Some(payment_id.into()),
            Some(signature.into()),
        )
    }

    /// Create a request from optional fields (as they arrive in a request body).
    ///
    /// Fields are checked in order: order id, payment id, signature.
    pub fn from_parts(
        order_id: Option<String>,
        payment_id: Option<String>,
        signature: Option<String>,
    ) -> PaymentResult<Self> {
        Ok(Self {
            order_id: require("order_id", order_id)?,
            payment_id: require("payment_id", payment_id)?,
            signature: require("signature", signature)?,
        })
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn payment_id(&self) -> &str {
        &self.payment_id
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }
}

/// Verifies gateway signatures with a secret fixed at construction.
///
/// Construct once at startup and share it (`Arc` or clone); it holds no
/// mutable state and is safe to call from any number of tasks.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    secret: SecretString,
}

impl SignatureVerifier {
    /// Create a verifier from a plain secret. Empty secrets are rejected.
    pub fn new(secret: impl Into<String>) -> PaymentResult<Self> {
        Self::from_secret(SecretString::new(secret.into()))
    }

    /// Create a verifier from an already-wrapped secret
    pub fn from_secret(secret: SecretString) -> PaymentResult<Self> {
        if secret.expose_secret().is_empty() {
            return Err(PaymentError::MissingField { field: "secret" });
        }
        Ok(Self { secret })
    }

    /// Compute the signature the gateway would issue for this pair
    pub fn sign(&self, order_id: &str, payment_id: &str) -> String {
        compute_signature(self.secret.expose_secret().as_bytes(), order_id, payment_id)
    }

    /// Returns true only if the provided signature matches exactly.
    pub fn verify(&self, request: &VerificationRequest) -> bool {
        let expected = self.sign(&request.order_id, &request.payment_id);
        constant_time_eq(&expected, &request.signature)
    }
}

/// Length is public (always 64 hex chars for SHA-256); content is compared
/// without early exit.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

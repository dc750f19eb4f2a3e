//! # Order Types
//!
//! Order creation input, the options sent to the gateway, and typed views of
//! the order and payment records the gateway returns.

use crate::error::{PaymentError, PaymentResult};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Currency used when the request does not name one
pub const DEFAULT_CURRENCY: &str = "INR";

/// User id recorded when the request is anonymous
pub const GUEST_USER: &str = "guest";

/// Amount as it arrives from the browser: either a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    /// Parse to a positive, finite amount in major units (rupees, dollars, ...)
    pub fn to_major(&self) -> PaymentResult<f64> {
        let value = match self {
            AmountInput::Number(n) => *n,
            AmountInput::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                PaymentError::InvalidAmount(format!("'{}' is not a number", s))
            })?,
        };

        if !value.is_finite() || value <= 0.0 {
            return Err(PaymentError::InvalidAmount(
                "Amount must be a positive number".to_string(),
            ));
        }

        Ok(value)
    }
}

/// Convert major units to integer sub-units (paise for INR), rounding to the nearest.
pub fn to_subunits(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Create order request body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Amount in major units
    #[serde(default)]
    pub amount: Option<AmountInput>,
    /// Currency code (defaults to INR)
    #[serde(default)]
    pub currency: Option<String>,
    /// Caller's user id (defaults to "guest")
    #[serde(default)]
    pub user_id: Option<String>,
    /// Cart items; only the count is forwarded to the gateway
    #[serde(default)]
    pub items: Option<Vec<Value>>,
}

impl CreateOrderRequest {
    /// Validated amount in major units
    pub fn amount(&self) -> PaymentResult<f64> {
        self.amount
            .as_ref()
            .ok_or_else(|| PaymentError::InvalidAmount("Amount is required".to_string()))?
            .to_major()
    }

    pub fn user_id(&self) -> &str {
        self.user_id
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(GUEST_USER)
    }

    pub fn currency(&self) -> &str {
        self.currency
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CURRENCY)
    }

    pub fn item_count(&self) -> usize {
        self.items.as_ref().map(Vec::len).unwrap_or(0)
    }
}

/// Receipt prefix; each order-creation route tags its receipts differently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptPrefix {
    /// `/create-order`
    Receipt,
    /// `/orders`
    Order,
}

impl ReceiptPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptPrefix::Receipt => "receipt",
            ReceiptPrefix::Order => "order",
        }
    }
}

/// Notes attached to a gateway order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotes {
    pub user_id: String,
    pub item_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Options for creating an order at the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderOptions {
    /// Amount in sub-units
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: OrderNotes,
}

impl OrderOptions {
    /// Build gateway options from a validated request.
    ///
    /// Receipts look like `receipt_{user}_{unix_millis}`. Only `Receipt`
    /// orders carry a timestamp note.
    pub fn from_request(
        request: &CreateOrderRequest,
        prefix: ReceiptPrefix,
        now: DateTime<Utc>,
    ) -> PaymentResult<Self> {
        let amount = to_subunits(request.amount()?);
        let user_id = request.user_id().to_string();

        let timestamp = match prefix {
            ReceiptPrefix::Receipt => Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ReceiptPrefix::Order => None,
        };

        Ok(Self {
            amount,
            currency: request.currency().to_string(),
            receipt: format!("{}_{}_{}", prefix.as_str(), user_id, now.timestamp_millis()),
            notes: OrderNotes {
                user_id,
                item_count: request.item_count(),
                timestamp,
            },
        })
    }
}

/// Check that a gateway id is a single opaque token (`order_...`, `pay_...`).
///
/// Ids end up as URL path segments at the gateway, so only ASCII
/// alphanumerics and `_` are accepted.
pub fn validate_gateway_id(field: &'static str, id: &str) -> PaymentResult<()> {
    if id.is_empty() {
        return Err(PaymentError::MissingField { field });
    }

    if !id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return Err(PaymentError::InvalidRequest(format!(
            "{} must contain only letters, digits and underscores",
            field
        )));
    }

    Ok(())
}

fn str_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

/// An order as recorded by the gateway.
///
/// Only the fields every order carries are typed. Everything else stays in
/// `extra` exactly as received, absent keys and explicit nulls included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    /// Amount in sub-units
    pub amount: i64,
    pub currency: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GatewayOrder {
    pub fn receipt(&self) -> Option<&str> {
        str_field(&self.extra, "receipt")
    }

    pub fn status(&self) -> Option<&str> {
        str_field(&self.extra, "status")
    }

    pub fn is_paid(&self) -> bool {
        self.status() == Some("paid")
    }
}

/// A payment as recorded by the gateway. Same pass-through rules as [`GatewayOrder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayPayment {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GatewayPayment {
    pub fn order_id(&self) -> Option<&str> {
        str_field(&self.extra, "order_id")
    }

    pub fn method(&self) -> Option<&str> {
        str_field(&self.extra, "method")
    }

    pub fn is_captured(&self) -> bool {
        self.extra.get("captured").and_then(Value::as_bool) == Some(true)
            || self.status == "captured"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_123).unwrap()
    }

    fn request(body: Value) -> CreateOrderRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_amount_parsing() {
        assert_eq!(AmountInput::Number(499.0).to_major().unwrap(), 499.0);
        assert_eq!(AmountInput::Text(" 12.5 ".into()).to_major().unwrap(), 12.5);
        assert!(AmountInput::Number(0.0).to_major().is_err());
        assert!(AmountInput::Number(-3.0).to_major().is_err());
        assert!(AmountInput::Text("abc".into()).to_major().is_err());
        assert!(AmountInput::Text("".into()).to_major().is_err());
        assert!(AmountInput::Text("NaN".into()).to_major().is_err());
    }

    #[test]
    fn test_to_subunits_rounds() {
        assert_eq!(to_subunits(499.0), 49900);
        assert_eq!(to_subunits(19.99), 1999);
        assert_eq!(to_subunits(0.015), 2);
    }

    #[test]
    fn test_missing_amount() {
        let req = request(json!({ "currency": "INR" }));
        let err = req.amount().unwrap_err();
        assert!(matches!(err, PaymentError::InvalidAmount(_)));
    }

    #[test]
    fn test_defaults() {
        let req = request(json!({ "amount": 100 }));
        assert_eq!(req.currency(), "INR");
        assert_eq!(req.user_id(), "guest");
        assert_eq!(req.item_count(), 0);

        let req = request(json!({ "amount": 100, "userId": "", "currency": "" }));
        assert_eq!(req.currency(), "INR");
        assert_eq!(req.user_id(), "guest");
    }

    #[test]
    fn test_options_receipt_prefix() {
        let req = request(json!({
            "amount": "250.50",
            "currency": "USD",
            "userId": "u42",
            "items": [{ "sku": "a" }, { "sku": "b" }]
        }));

        let opts = OrderOptions::from_request(&req, ReceiptPrefix::Receipt, fixed_now()).unwrap();
        assert_eq!(opts.amount, 25050);
        assert_eq!(opts.currency, "USD");
        assert_eq!(opts.receipt, "receipt_u42_1700000000123");
        assert_eq!(opts.notes.user_id, "u42");
        assert_eq!(opts.notes.item_count, 2);
        assert_eq!(
            opts.notes.timestamp.as_deref(),
            Some("2023-11-14T22:13:20.123Z")
        );

        let opts = OrderOptions::from_request(&req, ReceiptPrefix::Order, fixed_now()).unwrap();
        assert_eq!(opts.receipt, "order_u42_1700000000123");
        assert!(opts.notes.timestamp.is_none());
    }

    #[test]
    fn test_options_serialization() {
        let req = request(json!({ "amount": 1 }));
        let opts = OrderOptions::from_request(&req, ReceiptPrefix::Order, fixed_now()).unwrap();
        let value = serde_json::to_value(&opts).unwrap();

        assert_eq!(value["amount"], 100);
        assert_eq!(value["notes"]["userId"], "guest");
        assert_eq!(value["notes"]["itemCount"], 0);
        assert!(value["notes"].get("timestamp").is_none());
    }

    #[test]
    fn test_gateway_order_roundtrips_unknown_fields() {
        let raw = json!({
            "id": "order_IluGWxBm9U8zJ8",
            "entity": "order",
            "amount": 5000,
            "amount_paid": 0,
            "amount_due": 5000,
            "currency": "INR",
            "receipt": "rcptid_11",
            "offer_id": null,
            "status": "created",
            "attempts": 0,
            "notes": [],
            "created_at": 1642662092
        });

        let order: GatewayOrder = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(order.id, "order_IluGWxBm9U8zJ8");
        assert_eq!(order.extra.get("amount_due"), Some(&json!(5000)));
        assert_eq!(order.receipt(), Some("rcptid_11"));
        assert!(!order.is_paid());
        assert!(order.extra.contains_key("offer_id"));

        assert_eq!(serde_json::to_value(&order).unwrap(), raw);
    }

    #[test]
    fn test_sparse_gateway_order_gains_no_fields() {
        let raw = json!({
            "id": "order_1",
            "amount": 100,
            "currency": "INR",
            "status": "attempted"
        });

        let order: GatewayOrder = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(order.status(), Some("attempted"));
        assert!(!order.extra.contains_key("amount_due"));
        assert_eq!(order.receipt(), None);

        assert_eq!(serde_json::to_value(&order).unwrap(), raw);

        let raw = json!({
            "id": "order_2",
            "amount": 100,
            "currency": "INR",
            "receipt": null,
            "status": "paid"
        });
        let order: GatewayOrder = serde_json::from_value(raw.clone()).unwrap();
        assert!(order.is_paid());
        assert_eq!(serde_json::to_value(&order).unwrap(), raw);
    }

    #[test]
    fn test_gateway_payment() {
        let payment: GatewayPayment = serde_json::from_value(json!({
            "id": "pay_29QQoUBi66xm2f",
            "entity": "payment",
            "amount": 5000,
            "currency": "INR",
            "status": "captured",
            "order_id": "order_9A33XWu170gUtm",
            "method": "card",
            "captured": true,
            "email": "gaurav.kumar@example.com",
            "contact": "+919876543210",
            "fee": 118,
            "created_at": 1400826750
        }))
        .unwrap();

        assert!(payment.is_captured());
        assert_eq!(payment.order_id(), Some("order_9A33XWu170gUtm"));
        assert_eq!(payment.method(), Some("card"));
        assert_eq!(payment.extra.get("fee"), Some(&json!(118)));
    }

    #[test]
    fn test_sparse_gateway_payment_gains_no_fields() {
        let raw = json!({
            "id": "pay_1",
            "amount": 100,
            "currency": "INR",
            "status": "authorized"
        });

        let payment: GatewayPayment = serde_json::from_value(raw.clone()).unwrap();
        assert!(!payment.is_captured());
        assert_eq!(payment.order_id(), None);
        assert_eq!(serde_json::to_value(&payment).unwrap(), raw);
    }

    #[test]
    fn test_validate_gateway_id() {
        assert!(validate_gateway_id("order_id", "order_IluGWxBm9U8zJ8").is_ok());
        assert!(validate_gateway_id("payment_id", "pay_29QQoUBi66xm2f").is_ok());

        let err = validate_gateway_id("order_id", "").unwrap_err();
        assert!(matches!(err, PaymentError::MissingField { field: "order_id" }));

        for id in [
            "../refunds/rfnd_secret",
            "order_1/payments",
            "order_1?expand[]=payments",
            "order_1#x",
            "..",
            "order 1",
            "order_1%2F",
            "ordér_1",
        ] {
            let err = validate_gateway_id("order_id", id).unwrap_err();
            assert!(matches!(err, PaymentError::InvalidRequest(_)), "{}", id);
            assert_eq!(err.status_code(), 400);
        }
    }
}

//! # Razorpay Orders & Payments
//!
//! `PaymentGateway` implementation over the Razorpay REST API.
//! Requests use HTTP basic auth with the key id and key secret.

use crate::config::RazorpayConfig;
use async_trait::async_trait;
use pay_core::{
    validate_gateway_id, GatewayOrder, GatewayPayment, OrderOptions, PaymentError,
    PaymentGateway, PaymentResult,
};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "razorpay";

/// Razorpay gateway client
pub struct RazorpayGateway {
    config: RazorpayConfig,
    client: Client,
}

impl RazorpayGateway {
    /// Create a new Razorpay gateway client
    pub fn new(config: RazorpayConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| {
                PaymentError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// `{base}/v1/{segments...}`, each segment percent-encoded on its own
    fn url(&self, segments: &[&str]) -> PaymentResult<Url> {
        let base = &self.config.api_base_url;
        let mut url = Url::parse(base).map_err(|e| {
            PaymentError::Configuration(format!("Invalid Razorpay API base URL {}: {}", base, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                PaymentError::Configuration(format!("Razorpay API base URL {} has no path", base))
            })?
            .pop_if_empty()
            .push("v1")
            .extend(segments);

        Ok(url)
    }

    /// Attach credentials, send, and decode the response
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> PaymentResult<T> {
        let response = request
            .basic_auth(&self.config.key_id, Some(self.config.expose_key_secret()))
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Razorpay API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<RazorpayErrorResponse>(&body) {
                debug!(
                    code = ?error_response.error.code,
                    field = ?error_response.error.field,
                    "Razorpay rejected request"
                );
                return Err(PaymentError::ProviderError {
                    provider: PROVIDER.to_string(),
                    message: error_response.error.description,
                });
            }

            return Err(PaymentError::ProviderError {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Razorpay response: {}", e))
        })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    #[instrument(skip(self, options), fields(receipt = %options.receipt, amount = options.amount))]
    async fn create_order(&self, options: &OrderOptions) -> PaymentResult<GatewayOrder> {
        debug!(
            "Creating Razorpay order: currency={}, items={}",
            options.currency, options.notes.item_count
        );

        let order: GatewayOrder = self
            .send(self.client.post(self.url(&["orders"])?).json(options))
            .await?;

        info!("Created Razorpay order: id={}", order.id);

        Ok(order)
    }

    #[instrument(skip(self))]
    async fn fetch_order(&self, order_id: &str) -> PaymentResult<GatewayOrder> {
        validate_gateway_id("order_id", order_id)?;
        self.send(self.client.get(self.url(&["orders", order_id])?))
            .await
    }

    #[instrument(skip(self))]
    async fn fetch_payment(&self, payment_id: &str) -> PaymentResult<GatewayPayment> {
        validate_gateway_id("payment_id", payment_id)?;
        self.send(self.client.get(self.url(&["payments", payment_id])?))
            .await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn key_id(&self) -> &str {
        &self.config.key_id
    }
}

// =============================================================================
// Razorpay API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct RazorpayErrorResponse {
    error: RazorpayError,
}

#[derive(Debug, Deserialize)]
struct RazorpayError {
    description: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    field: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pay_core::OrderNotes;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const AUTH: &str = "Basic cnpwX3Rlc3RfYWJjMTIzOmtleV9zZWNyZXRfZml4dHVyZQ==";

    fn fixed_options() -> OrderOptions {
        OrderOptions {
            amount: 49900,
            currency: "INR".to_string(),
            receipt: "order_u1_1".to_string(),
            notes: OrderNotes {
                user_id: "u1".to_string(),
                item_count: 1,
                timestamp: None,
            },
        }
    }

    async fn gateway(server: &MockServer) -> RazorpayGateway {
        let config = RazorpayConfig::new("rzp_test_abc123", "key_secret_fixture")
            .with_api_base_url(server.uri());
        RazorpayGateway::new(config).unwrap()
    }

    fn order_json() -> serde_json::Value {
        json!({
            "id": "order_EKwxwAgItmmXdp",
            "entity": "order",
            "amount": 49900,
            "amount_paid": 0,
            "amount_due": 49900,
            "currency": "INR",
            "receipt": "order_u1_1",
            "status": "created",
            "attempts": 0,
            "notes": { "userId": "u1", "itemCount": 1 },
            "created_at": 1582628071
        })
    }

    #[tokio::test]
    async fn test_create_order_request_shape() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/orders"))
            .and(header("authorization", AUTH))
            .and(body_json(json!({
                "amount": 49900,
                "currency": "INR",
                "receipt": "order_u1_1",
                "notes": { "userId": "u1", "itemCount": 1 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(order_json()))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway(&server).await;
        let order = gateway.create_order(&fixed_options()).await.unwrap();

        assert_eq!(order.id, "order_EKwxwAgItmmXdp");
        assert_eq!(order.amount, 49900);
        assert_eq!(order.receipt(), Some("order_u1_1"));
    }

    #[tokio::test]
    async fn test_fetch_payment() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/payments/pay_DGSR6N5wXkmQfa"))
            .and(header("authorization", AUTH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pay_DGSR6N5wXkmQfa",
                "entity": "payment",
                "amount": 49900,
                "currency": "INR",
                "status": "captured",
                "order_id": "order_EKwxwAgItmmXdp",
                "method": "upi",
                "captured": true,
                "vpa": "gaurav.kumar@exampleupi"
            })))
            .mount(&server)
            .await;

        let gateway = gateway(&server).await;
        let payment = gateway.fetch_payment("pay_DGSR6N5wXkmQfa").await.unwrap();

        assert!(payment.is_captured());
        assert_eq!(payment.method(), Some("upi"));
        assert!(payment.extra.contains_key("vpa"));
    }

    #[tokio::test]
    async fn test_fetch_order_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/orders/order_missing"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": "BAD_REQUEST_ERROR",
                    "description": "The id provided does not exist",
                    "field": "id"
                }
            })))
            .mount(&server)
            .await;

        let gateway = gateway(&server).await;
        let err = gateway.fetch_order("order_missing").await.unwrap_err();

        match err {
            PaymentError::ProviderError { provider, message } => {
                assert_eq!(provider, "razorpay");
                assert_eq!(message, "The id provided does not exist");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/orders/order_x"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let gateway = gateway(&server).await;
        let err = gateway.fetch_order("order_x").await.unwrap_err();

        assert_eq!(err.status_code(), 502);
        assert!(err.to_string().contains("upstream down"));
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/payments/pay_x"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let gateway = gateway(&server).await;
        let err = gateway.fetch_payment("pay_x").await.unwrap_err();

        assert!(matches!(err, PaymentError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_lookup_ids_cannot_leave_their_collection() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/refunds/rfnd_secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "rfnd_secret",
                "entity": "refund",
                "amount": 100,
                "currency": "INR",
                "status": "processed"
            })))
            .expect(0)
            .mount(&server)
            .await;

        let gateway = gateway(&server).await;

        let err = gateway
            .fetch_order("../refunds/rfnd_secret")
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::InvalidRequest(_)));

        let err = gateway
            .fetch_payment("..%2Frefunds%2Frfnd_secret")
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::InvalidRequest(_)));

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_url_escapes_each_segment() {
        let server = MockServer::start().await;
        let gateway = gateway(&server).await;

        let url = gateway.url(&["orders", "../refunds/x?y#z"]).unwrap();
        assert_eq!(url.path(), "/v1/orders/..%2Frefunds%2Fx%3Fy%23z");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());

        let url = gateway.url(&["orders"]).unwrap();
        assert_eq!(url.as_str(), format!("{}/v1/orders", server.uri()));
    }

    #[test]
    fn test_invalid_base_url() {
        let config = RazorpayConfig::new("rzp_test_abc123", "key_secret_fixture")
            .with_api_base_url("not a url");
        let gateway = RazorpayGateway::new(config).unwrap();

        let err = gateway.url(&["orders"]).unwrap_err();
        assert!(matches!(err, PaymentError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_key_id_exposed_not_secret() {
        let server = MockServer::start().await;
        let gateway = gateway(&server).await;

        assert_eq!(gateway.key_id(), "rzp_test_abc123");
        assert_eq!(gateway.provider_name(), "razorpay");
    }
}

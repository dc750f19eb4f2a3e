//! # Request Handlers
//!
//! Axum request handlers for the payment API: order creation, payment
//! signature verification, and order/payment lookup.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{SecondsFormat, Utc};
use pay_core::{
    validate_gateway_id, CreateOrderRequest, GatewayOrder, GatewayPayment, OrderOptions,
    PaymentError, ReceiptPrefix, VerificationRequest,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Payment verification request, as posted by the browser checkout handler
#[derive(Debug, Default, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
    #[serde(default)]
    pub razorpay_signature: Option<String>,
}

/// `/create-order` response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    pub razorpay_key_id: String,
}

/// `/orders` response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedResponse {
    pub success: bool,
    pub order: GatewayOrder,
    pub razorpay_key_id: String,
}

/// Successful verification response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
    pub payment_id: String,
    pub order_id: String,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub success: bool,
    pub order: GatewayOrder,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub success: bool,
    pub payment: GatewayPayment,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            success: false,
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub const MISSING_VERIFICATION_PARAMS: &str = "Missing required payment verification parameters";
pub const VERIFICATION_FAILED: &str = "Payment verification failed";

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message, 400)))
}

fn payment_error_to_response(err: PaymentError, state: &AppState) -> ApiError {
    let code = err.status_code();
    let message = match &err {
        PaymentError::ProviderError { message, .. } => message.clone(),
        other => other.to_string(),
    };

    let mut response = ErrorResponse::new(message, code);
    if !state.config.is_production() {
        response = response.with_details(format!("{:?}", err));
    }

    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn json_rejection_to_response(rejection: JsonRejection) -> ApiError {
    let status = rejection.status();
    (
        status,
        Json(ErrorResponse::new(rejection.body_text(), status.as_u16())),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "success",
        "message": "Payment service is running",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create an order (flat response with the checkout fields the browser needs)
#[instrument(skip(state, payload))]
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<CreateOrderResponse>, ApiError> {
    let Json(request) = payload.map_err(json_rejection_to_response)?;

    let order = create_order_internal(
        &state,
        &request,
        ReceiptPrefix::Receipt,
        "Invalid amount. Amount must be a positive number.",
    )
    .await?;

    let receipt = order.receipt().map(str::to_string);
    Ok(Json(CreateOrderResponse {
        success: true,
        order_id: order.id,
        amount: order.amount,
        currency: order.currency,
        receipt,
        razorpay_key_id: state.gateway.key_id().to_string(),
    }))
}

/// Create an order (returns the full gateway order)
#[instrument(skip(state, payload))]
pub async fn create_order_full(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<OrderCreatedResponse>, ApiError> {
    let Json(request) = payload.map_err(json_rejection_to_response)?;

    let order =
        create_order_internal(&state, &request, ReceiptPrefix::Order, "Invalid amount").await?;

    Ok(Json(OrderCreatedResponse {
        success: true,
        order,
        razorpay_key_id: state.gateway.key_id().to_string(),
    }))
}

/// Internal order creation (shared logic)
async fn create_order_internal(
    state: &AppState,
    request: &CreateOrderRequest,
    prefix: ReceiptPrefix,
    invalid_amount_message: &str,
) -> Result<GatewayOrder, ApiError> {
    let options = OrderOptions::from_request(request, prefix, Utc::now()).map_err(|e| {
        warn!("Rejected order request: {}", e);
        bad_request(invalid_amount_message)
    })?;

    info!(
        "Creating order: user={}, amount={} {}, items={}",
        options.notes.user_id, options.amount, options.currency, options.notes.item_count
    );

    let order = state.gateway.create_order(&options).await.map_err(|e| {
        error!("Order creation failed: {}", e);
        payment_error_to_response(e, state)
    })?;

    info!(order_id = %order.id, status = ?order.status(), "Order created");

    Ok(order)
}

/// Verify a payment signature returned by the browser checkout
#[instrument(skip(state, payload))]
pub async fn verify_payment(
    State(state): State<AppState>,
    payload: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> Result<Json<VerifyPaymentResponse>, ApiError> {
    let Json(body) = payload.map_err(json_rejection_to_response)?;

    let request = VerificationRequest::from_parts(
        body.razorpay_order_id,
        body.razorpay_payment_id,
        body.razorpay_signature,
    )
    .map_err(|e| {
        warn!("Rejected verification request: {}", e);
        bad_request(MISSING_VERIFICATION_PARAMS)
    })?;

    if !state.verifier.verify(&request) {
        warn!(
            order_id = %request.order_id(),
            payment_id = %request.payment_id(),
            "Payment verification failed - signature mismatch"
        );
        return Err(bad_request(VERIFICATION_FAILED));
    }

    info!(
        order_id = %request.order_id(),
        payment_id = %request.payment_id(),
        "Payment verified"
    );

    Ok(Json(VerifyPaymentResponse {
        success: true,
        message: "Payment verified successfully".to_string(),
        payment_id: request.payment_id().to_string(),
        order_id: request.order_id().to_string(),
    }))
}

/// Fetch payment details from the gateway
#[instrument(skip(state))]
pub async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> Result<Json<PaymentResponse>, ApiError> {
    validate_gateway_id("payment_id", &payment_id).map_err(|e| {
        warn!("Rejected payment lookup: {}", e);
        payment_error_to_response(e, &state)
    })?;

    let payment = state.gateway.fetch_payment(&payment_id).await.map_err(|e| {
        error!("Error fetching payment {}: {}", payment_id, e);
        payment_error_to_response(e, &state)
    })?;

    info!(
        payment_id = %payment.id,
        order_id = ?payment.order_id(),
        method = ?payment.method(),
        captured = payment.is_captured(),
        "Payment fetched"
    );

    Ok(Json(PaymentResponse {
        success: true,
        payment,
    }))
}

/// Fetch order details from the gateway
#[instrument(skip(state))]
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    validate_gateway_id("order_id", &order_id).map_err(|e| {
        warn!("Rejected order lookup: {}", e);
        payment_error_to_response(e, &state)
    })?;

    let order = state.gateway.fetch_order(&order_id).await.map_err(|e| {
        error!("Error fetching order {}: {}", order_id, e);
        payment_error_to_response(e, &state)
    })?;

    info!(order_id = %order.id, paid = order.is_paid(), "Order fetched");

    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}

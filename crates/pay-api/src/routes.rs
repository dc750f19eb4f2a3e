//! # Routes
//!
//! Axum router configuration for the payment API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN},
        HeaderName, Method,
    },
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Prefix all payment routes are nested under
pub const PAYMENT_PREFIX: &str = "/api/payment";

/// Create the main application router
///
/// Routes:
/// - GET  /health                            - Health check (also `/` and `/api/payment/health`)
/// - POST /api/payment/create-order          - Create order, flat response
/// - POST /api/payment/orders                - Create order, full gateway order
/// - POST /api/payment/verify                - Verify payment signature
/// - GET  /api/payment/payment/{payment_id}  - Fetch payment
/// - GET  /api/payment/order/{order_id}      - Fetch order
pub fn create_router(state: AppState) -> Router {
    // Browser checkout runs on arbitrary storefront origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            ORIGIN,
            HeaderName::from_static("x-requested-with"),
            CONTENT_TYPE,
            ACCEPT,
            AUTHORIZATION,
        ]);

    let payment_routes = Router::new()
        .route("/health", get(handlers::health))
        // Orders
        .route("/create-order", post(handlers::create_order))
        .route("/orders", post(handlers::create_order_full))
        // Verification
        .route("/verify", post(handlers::verify_payment))
        // Lookup
        .route("/payment/{payment_id}", get(handlers::get_payment))
        .route("/order/{order_id}", get(handlers::get_order));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest(PAYMENT_PREFIX, payment_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

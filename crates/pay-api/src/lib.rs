//! # pay-api
//!
//! HTTP API layer for the payment service.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Order creation and lookup endpoints backed by the payment gateway
//! - Payment signature verification endpoint
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/payment/create-order` | Create order |
//! | POST | `/api/payment/orders` | Create order (full gateway record) |
//! | POST | `/api/payment/verify` | Verify payment signature |
//! | GET | `/api/payment/payment/{id}` | Get payment |
//! | GET | `/api/payment/order/{id}` | Get order |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};

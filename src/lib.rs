pub mod config;
pub mod domain {
    pub mod payment;
}
pub mod error;
pub mod gateways;
pub mod http {
    pub mod handlers {
        pub mod ops;
        pub mod payments;
    }
}
pub mod service {
    pub mod payment_service;
    pub mod response_mapper;
    pub mod validation;
}

use axum::routing::{get, post};
use axum::Router;

#[derive(Clone)]
pub struct AppState {
    pub payment_service: service::payment_service::PaymentService,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::handlers::payments::health))
        .route(
            "/api/create-payment",
            post(http::handlers::payments::create_payment),
        )
        .route(
            "/api/payment-status",
            get(http::handlers::payments::payment_status),
        )
        .route(
            "/api/payment-status/",
            get(http::handlers::payments::payment_status),
        )
        .route(
            "/api/payment-status/:id",
            get(http::handlers::payments::payment_status),
        )
        .route("/ops/readiness", get(http::handlers::ops::readiness))
        .route("/ops/liveness", get(http::handlers::ops::liveness))
        .with_state(state)
}

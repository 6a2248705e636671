pub mod config;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{health, payments, status, webhook};
use crate::services::{GatewayClient, RelayService};
use self::config::Config;

pub type AppState = Arc<RelayService>;

/// Wires the immutable config into a gateway client and the relay service.
pub fn build_state(config: Config) -> anyhow::Result<AppState> {
    let config = Arc::new(config);
    let gateway = GatewayClient::new(&config)?;
    Ok(Arc::new(RelayService::new(config, gateway)))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::heartbeat))
        .route("/api/health", get(health::health))
        .route("/api/payment", post(payments::create_payment))
        .route("/api/order-status", post(status::order_status))
        .route("/api/payment-status", post(status::payment_status))
        .route("/api/webhook", post(webhook::receive_webhook))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

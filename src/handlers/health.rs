use axum::{extract::State, response::Json};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::app::AppState;

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `GET /`
pub async fn heartbeat(State(service): State<AppState>) -> Json<Value> {
    let config = service.config();
    Json(json!({
        "status": "Backend running",
        "timestamp": timestamp(),
        "environment": config.environment_name,
        "hasCredentials": config.has_credentials(),
    }))
}

/// `GET /api/health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "service": "Cashfree Payment Backend",
        "timestamp": timestamp(),
    }))
}

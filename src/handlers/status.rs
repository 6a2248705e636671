use axum::{extract::State, response::Json};
use serde_json::Value;
use tracing::info;

use crate::app::AppState;
use crate::error::RelayResult;
use crate::handlers::JsonBody;
use crate::models::{ApiResponse, StatusQuery};

/// `POST /api/order-status`
pub async fn order_status(
    State(service): State<AppState>,
    JsonBody(body): JsonBody<StatusQuery>,
) -> RelayResult<Json<ApiResponse<Value>>> {
    service.ensure_configured()?;
    let query = body?;

    info!(order_id = ?query.order_id, "Order status requested");

    let body = service.order_status(query).await?;
    Ok(Json(ApiResponse::ok(body)))
}

/// `POST /api/payment-status`
pub async fn payment_status(
    State(service): State<AppState>,
    JsonBody(body): JsonBody<StatusQuery>,
) -> RelayResult<Json<ApiResponse<Value>>> {
    service.ensure_configured()?;
    let query = body?;

    info!(
        order_id = ?query.order_id,
        payment_id = ?query.payment_id,
        "Payment status requested"
    );

    let body = service.payment_status(query).await?;
    Ok(Json(ApiResponse::ok(body)))
}

use axum::{extract::State, response::Json};
use serde_json::Value;
use tracing::info;

use crate::app::AppState;
use crate::error::RelayResult;
use crate::handlers::JsonBody;
use crate::models::{ApiResponse, PaymentRequest};

/// `POST /api/payment`
pub async fn create_payment(
    State(service): State<AppState>,
    JsonBody(body): JsonBody<PaymentRequest>,
) -> RelayResult<Json<ApiResponse<Value>>> {
    service.ensure_configured()?;
    let request = body?;

    info!(customer_id = ?request.customer_id, "Received payment request");

    let body = service.create_payment(request).await?;
    Ok(Json(ApiResponse::ok(body)))
}

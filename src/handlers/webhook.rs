use axum::{
    body::{to_bytes, Bytes},
    extract::{Request, State},
    http::HeaderMap,
    response::Json,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::app::AppState;
use crate::error::{RelayError, RelayResult};
use crate::models::{ApiResponse, WebhookNotification};
use crate::services::webhook::{
    process_notification, verify_signature, SIGNATURE_HEADER, TIMESTAMP_HEADER,
};

const MAX_WEBHOOK_BYTES: usize = 2 * 1024 * 1024;

/// `POST /api/webhook`
///
/// Acknowledges every notification it can read, whatever its status value,
/// so the gateway never retries because of how the relay classified it.
pub async fn receive_webhook(
    State(service): State<AppState>,
    headers: HeaderMap,
    request: Request,
) -> RelayResult<Json<ApiResponse<Value>>> {
    let body = to_bytes(request.into_body(), MAX_WEBHOOK_BYTES)
        .await
        .map_err(|e| {
            RelayError::Internal(format!("Webhook processing failed: {}", e))
        })?;

    if service.config().verify_webhook_signatures {
        check_signature(&service, &headers, &body)?;
    }

    let notification = match serde_json::from_slice::<WebhookNotification>(&body) {
        Ok(notification) => notification,
        Err(e) => {
            warn!(error = %e, "Webhook body is not a recognised notification");
            WebhookNotification::default()
        }
    };
    info!(event_type = ?notification.event_type, "Webhook received");

    process_notification(&notification);

    Ok(Json(ApiResponse::acknowledged("Webhook processed")))
}

fn check_signature(service: &AppState, headers: &HeaderMap, body: &Bytes) -> RelayResult<()> {
    let credentials = service
        .config()
        .credentials
        .as_ref()
        .ok_or_else(RelayError::missing_credentials)?;

    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    let (Some(signature), Some(timestamp)) = (header(SIGNATURE_HEADER), header(TIMESTAMP_HEADER))
    else {
        return Err(RelayError::Unauthorized(
            "Missing webhook signature headers".to_string(),
        ));
    };

    if verify_signature(
        credentials.client_secret.as_bytes(),
        timestamp,
        body,
        signature,
    ) {
        Ok(())
    } else {
        Err(RelayError::Unauthorized("Invalid webhook signature".to_string()))
    }
}

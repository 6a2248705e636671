use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, warn};

pub type RelayResult<T> = Result<T, RelayError>;

pub const GENERIC_UPSTREAM_MESSAGE: &str = "Error processing the request.";

/// Everything a relay route can fail with. Each variant renders as the
/// `{success: false, message, ...}` envelope.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Config(String),

    /// Transport failure or non-2xx answer from the gateway.
    #[error("{message}")]
    Upstream { status: Option<u16>, message: String },

    /// The gateway answered 2xx but the body lacks what the route needs.
    #[error("{message}")]
    ContractViolation {
        error: String,
        message: String,
        upstream: Value,
    },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Internal(String),
}

impl RelayError {
    pub fn missing_credentials() -> Self {
        RelayError::Config("Cashfree credentials not configured".to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            RelayError::Config(_)
            | RelayError::Upstream { .. }
            | RelayError::ContractViolation { .. }
            | RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RelayError::Validation(_) => "VALIDATION_ERROR",
            RelayError::Config(_) => "CONFIG_ERROR",
            RelayError::Upstream { .. } => "UPSTREAM_ERROR",
            RelayError::ContractViolation { .. } => "CONTRACT_VIOLATION",
            RelayError::Unauthorized(_) => "UNAUTHORIZED",
            RelayError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn body(&self) -> Value {
        match self {
            RelayError::ContractViolation {
                error,
                message,
                upstream,
            } => json!({
                "success": false,
                "error": error,
                "message": message,
                "cashfreeResponse": upstream,
            }),
            other => json!({
                "success": false,
                "message": other.to_string(),
            }),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_client_error() {
            warn!(code = self.error_code(), status = status.as_u16(), "{}", self);
        } else {
            match &self {
                RelayError::ContractViolation { upstream, .. } => {
                    error!(code = self.error_code(), upstream = %upstream, "{}", self)
                }
                RelayError::Upstream { status: upstream_status, .. } => {
                    error!(code = self.error_code(), upstream_status = ?upstream_status, "{}", self)
                }
                _ => error!(code = self.error_code(), "{}", self),
            }
        }

        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            RelayError::Validation("Missing required fields".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::missing_credentials().status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::Upstream {
                status: Some(401),
                message: "authentication Failed".into()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::Unauthorized("bad signature".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_plain_envelope() {
        let body = RelayError::missing_credentials().body();
        assert_eq!(
            body,
            json!({"success": false, "message": "Cashfree credentials not configured"})
        );
    }

    #[test]
    fn test_contract_violation_carries_upstream_body() {
        let err = RelayError::ContractViolation {
            error: "missing_payment_session_id".into(),
            message: "No payment_session_id received from Cashfree.".into(),
            upstream: json!({"order_id": "ORDER_1"}),
        };
        let body = err.body();
        assert_eq!(body["success"], false);
        assert_eq!(body["cashfreeResponse"], json!({"order_id": "ORDER_1"}));
        assert_eq!(body["error"], "missing_payment_session_id");
    }

    #[test]
    fn test_into_response_status() {
        let resp = RelayError::Validation("x".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = RelayError::Internal("x".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

pub mod health;
pub mod payments;
pub mod status;
pub mod webhook;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::{RelayError, RelayResult};

/// JSON body whose failure is deferred to the handler, so checks that must
/// win over a bad body (missing credentials) can run first. The
/// `Content-Type` header is not required and an empty body reads as `{}`.
pub struct JsonBody<T>(pub RelayResult<T>);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let parsed = match Bytes::from_request(req, state).await {
            Ok(bytes) => parse_body(&bytes),
            Err(rejection) => Err(RelayError::Validation(format!(
                "Invalid request body: {}",
                rejection.body_text()
            ))),
        };
        Ok(JsonBody(parsed))
    }
}

fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> RelayResult<T> {
    let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        bytes
    };
    serde_json::from_slice(bytes)
        .map_err(|e| RelayError::Validation(format!("Invalid request body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaymentRequest, StatusQuery};

    #[test]
    fn test_empty_body_reads_as_empty_object() {
        let query: StatusQuery = parse_body(b"  ").unwrap();
        assert!(query.order_id.is_none());
    }

    #[test]
    fn test_unreadable_body_is_validation_error() {
        let result = parse_body::<PaymentRequest>(b"{not json");
        assert!(matches!(result, Err(RelayError::Validation(_))));
        let result = parse_body::<PaymentRequest>(b"[1, 2]");
        assert!(matches!(result, Err(RelayError::Validation(_))));
    }
}

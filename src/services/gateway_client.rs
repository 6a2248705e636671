use crate::app::config::{Config, Credentials};
use crate::error::{RelayError, RelayResult, GENERIC_UPSTREAM_MESSAGE};
use crate::models::payment::CreateOrderPayload;
use anyhow::Context;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

/// Thin REST client for the payment gateway. One call per relay request,
/// no retries.
pub struct GatewayClient {
    client: Client,
    base_url: Url,
    api_version: String,
}

impl GatewayClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("failed to create HTTP client")?;

        let base_url = Url::parse(config.gateway_base_url())
            .with_context(|| format!("invalid gateway base URL: {}", config.gateway_base_url()))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("gateway base URL cannot carry a path: {}", base_url);
        }

        Ok(Self {
            client,
            base_url,
            api_version: config.api_version.clone(),
        })
    }

    /// `POST /orders`
    pub async fn create_order(
        &self,
        credentials: &Credentials,
        payload: &CreateOrderPayload,
    ) -> RelayResult<Value> {
        let url = self.endpoint(&["orders"])?;
        info!(url = %url, order_id = %payload.order_id, "Creating order at gateway");
        debug!(
            client_id = %credentials.client_id,
            client_secret = "[HIDDEN]",
            api_version = %self.api_version,
            "Gateway request headers"
        );

        let request = self.client.post(url).json(payload);
        self.send(self.authorize(request, credentials)).await
    }

    /// `GET /orders/{order_id}`
    pub async fn get_order(&self, credentials: &Credentials, order_id: &str) -> RelayResult<Value> {
        let url = self.endpoint(&["orders", order_id])?;
        info!(url = %url, "Fetching order from gateway");

        let request = self.client.get(url);
        self.send(self.authorize(request, credentials)).await
    }

    /// `GET /orders/{order_id}/payments`
    pub async fn get_payments(
        &self,
        credentials: &Credentials,
        order_id: &str,
    ) -> RelayResult<Value> {
        let url = self.endpoint(&["orders", order_id, "payments"])?;
        info!(url = %url, "Fetching payments for order from gateway");

        let request = self.client.get(url);
        self.send(self.authorize(request, credentials)).await
    }

    /// `GET /orders/{order_id}/payments/{payment_id}`
    pub async fn get_payment(
        &self,
        credentials: &Credentials,
        order_id: &str,
        payment_id: &str,
    ) -> RelayResult<Value> {
        let url = self.endpoint(&["orders", order_id, "payments", payment_id])?;
        info!(url = %url, "Fetching payment from gateway");

        let request = self.client.get(url);
        self.send(self.authorize(request, credentials)).await
    }

    fn endpoint(&self, segments: &[&str]) -> RelayResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RelayError::Internal("gateway base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder, credentials: &Credentials) -> RequestBuilder {
        request
            .header("Content-Type", "application/json")
            .header("x-api-version", &self.api_version)
            .header("x-client-id", &credentials.client_id)
            .header("x-client-secret", &credentials.client_secret)
    }

    async fn send(&self, request: RequestBuilder) -> RelayResult<Value> {
        let response = request.send().await.map_err(|e| {
            let message = e.to_string();
            RelayError::Upstream {
                status: None,
                message: if message.is_empty() {
                    GENERIC_UPSTREAM_MESSAGE.to_string()
                } else {
                    message
                },
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| RelayError::Upstream {
            status: Some(status.as_u16()),
            message: e.to_string(),
        })?;
        let body = parse_body(&text);

        info!(status = status.as_u16(), "Gateway responded");
        debug!(body = %body, "Gateway response body");

        if status.is_success() {
            Ok(body)
        } else {
            Err(RelayError::Upstream {
                status: Some(status.as_u16()),
                message: upstream_message(&body)
                    .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16())),
            })
        }
    }
}

/// Empty bodies become `null`; bodies that are not JSON are kept as a string.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn upstream_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client_for(base: &str) -> GatewayClient {
        let config = Config::from_lookup(|key| match key {
            "GATEWAY_BASE_URL" => Some(base.to_string()),
            _ => None,
        });
        GatewayClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let client = client_for("https://sandbox.cashfree.com/pg");
        let url = client.endpoint(&["orders", "ORDER_1", "payments"]).unwrap();
        assert_eq!(url.as_str(), "https://sandbox.cashfree.com/pg/orders/ORDER_1/payments");
    }

    #[test]
    fn test_endpoint_percent_encodes_ids() {
        let client = client_for("https://sandbox.cashfree.com/pg");
        let url = client.endpoint(&["orders", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "https://sandbox.cashfree.com/pg/orders/a%2Fb%20c");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = Config::from_lookup(|key| match key {
            "GATEWAY_BASE_URL" => Some("not a url".to_string()),
            _ => None,
        });
        assert!(GatewayClient::new(&config).is_err());
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("{\"a\":1}"), json!({"a": 1}));
        assert_eq!(parse_body("Bad Gateway"), json!("Bad Gateway"));
    }

    #[test]
    fn test_upstream_message() {
        assert_eq!(
            upstream_message(&json!({"message": "order_id is invalid", "code": "order_id_invalid"})),
            Some("order_id is invalid".to_string())
        );
        assert_eq!(upstream_message(&json!({"message": ""})), None);
        assert_eq!(upstream_message(&json!("plain")), None);
    }
}

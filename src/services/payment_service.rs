use crate::app::config::{Config, Credentials};
use crate::error::{RelayError, RelayResult};
use crate::models::payment::{
    CreateOrderPayload, CustomerDetails, OrderMeta, OrderTags, PaymentRequest, StatusQuery,
    DEFAULT_CUSTOMER_EMAIL, DEFAULT_CUSTOMER_NAME, ORDER_CURRENCY, ORDER_NOTE,
};
use crate::services::gateway_client::GatewayClient;
use crate::services::order_id::generate_order_id;
use crate::utils::money::{format_currency, parse_order_amount};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

const SESSION_FIELD: &str = "payment_session_id";

/// Stateless orchestration behind the upstream-facing routes. Holds only
/// read-only configuration and the gateway client.
pub struct RelayService {
    config: Arc<Config>,
    gateway: GatewayClient,
}

impl RelayService {
    pub fn new(config: Arc<Config>, gateway: GatewayClient) -> Self {
        Self { config, gateway }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn create_payment(&self, request: PaymentRequest) -> RelayResult<Value> {
        let credentials = self.credentials()?;
        let order_id = generate_order_id();
        let payload = self.build_order_payload(order_id, request)?;

        info!(
            order_id = %payload.order_id,
            amount = %format_currency(payload.order_amount, payload.order_currency),
            environment = %self.config.environment,
            "Creating payment session"
        );

        let body = self.gateway.create_order(credentials, &payload).await?;

        let has_session = body
            .get(SESSION_FIELD)
            .map(|v| !v.is_null() && v.as_str() != Some(""))
            .unwrap_or(false);
        if !has_session {
            warn!(order_id = %payload.order_id, "Gateway response has no payment_session_id");
            return Err(RelayError::ContractViolation {
                error: "missing_payment_session_id".to_string(),
                message: "No payment_session_id received from Cashfree.".to_string(),
                upstream: body,
            });
        }

        info!(order_id = %payload.order_id, "Payment session created");
        Ok(body)
    }

    pub async fn order_status(&self, query: StatusQuery) -> RelayResult<Value> {
        let credentials = self.credentials()?;
        let order_id = required(query.order_id, "order_id is required")?;

        let body = self.gateway.get_order(credentials, &order_id).await?;
        non_empty(body, "Failed to fetch order status")
    }

    /// With `payment_id` the single payment is fetched, otherwise every
    /// payment attempt recorded for the order.
    pub async fn payment_status(&self, query: StatusQuery) -> RelayResult<Value> {
        let credentials = self.credentials()?;
        let order_id = required(query.order_id, "order_id is required")?;

        let body = match query.payment_id.filter(|id| !id.trim().is_empty()) {
            Some(payment_id) => {
                self.gateway
                    .get_payment(credentials, &order_id, &payment_id)
                    .await?
            }
            None => self.gateway.get_payments(credentials, &order_id).await?,
        };
        non_empty(body, "Failed to fetch payment status")
    }

    /// Fails with the config error when no gateway credentials are set.
    pub fn ensure_configured(&self) -> RelayResult<()> {
        self.credentials().map(|_| ())
    }

    fn credentials(&self) -> RelayResult<&Credentials> {
        self.config
            .credentials
            .as_ref()
            .ok_or_else(RelayError::missing_credentials)
    }

    pub fn build_order_payload(
        &self,
        order_id: String,
        request: PaymentRequest,
    ) -> RelayResult<CreateOrderPayload> {
        let order_amount = request.order_amount.as_ref().and_then(parse_order_amount);
        let customer_id = request.customer_id.filter(|s| !s.trim().is_empty());
        let customer_phone = request.customer_phone.filter(|s| !s.trim().is_empty());

        let (Some(order_amount), Some(customer_id), Some(customer_phone)) =
            (order_amount, customer_id, customer_phone)
        else {
            return Err(RelayError::Validation("Missing required fields".to_string()));
        };

        let return_url = match request.return_url.filter(|s| !s.trim().is_empty()) {
            Some(url) => url,
            None => default_return_url(&self.config.return_url_base, &order_id),
        };

        Ok(CreateOrderPayload {
            order_id,
            order_amount,
            order_currency: ORDER_CURRENCY,
            customer_details: CustomerDetails {
                customer_id,
                customer_name: request
                    .customer_name
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_CUSTOMER_NAME.to_string()),
                customer_email: request
                    .customer_email
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_CUSTOMER_EMAIL.to_string()),
                customer_phone,
            },
            order_meta: OrderMeta { return_url },
            order_note: ORDER_NOTE,
            order_tags: OrderTags::default(),
        })
    }
}

fn required(value: Option<String>, message: &str) -> RelayResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| RelayError::Validation(message.to_string()))
}

fn non_empty(body: Value, message: &str) -> RelayResult<Value> {
    let empty = match &body {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    };

    if empty {
        Err(RelayError::ContractViolation {
            error: "empty_response".to_string(),
            message: message.to_string(),
            upstream: body,
        })
    } else {
        Ok(body)
    }
}

/// `<base>?order_id=<id>`, keeping any query the base already has.
fn default_return_url(base: &str, order_id: &str) -> String {
    match Url::parse(base) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("order_id", order_id);
            url.to_string()
        }
        Err(_) => format!("{}?order_id={}", base, order_id),
    }
}

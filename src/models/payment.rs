use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ORDER_CURRENCY: &str = "INR";
pub const ORDER_NOTE: &str = "Luxe & Lush Jewelry Purchase";
pub const DEFAULT_CUSTOMER_NAME: &str = "Customer";
pub const DEFAULT_CUSTOMER_EMAIL: &str = "test@example.com";

/// Checkout request posted by the storefront. Text fields also accept
/// numbers; any other JSON type counts as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentRequest {
    #[serde(default)]
    pub order_amount: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub customer_phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub return_url: Option<String>,
}

/// Body of `/api/order-status` and `/api/payment-status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusQuery {
    #[serde(default, deserialize_with = "lenient_string")]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub payment_id: Option<String>,
}

/// Gateway notification. Both the flat shape and the nested
/// `data.order` / `data.payment` shape are understood. Any JSON object
/// parses; fields of an unexpected type read as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookNotification {
    #[serde(default, deserialize_with = "lenient_string")]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub order_status: Option<String>,
    #[serde(default)]
    pub order_amount: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub payment_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub payment_status: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub event_type: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl WebhookNotification {
    pub fn order_id(&self) -> Option<String> {
        self.order_id
            .clone()
            .or_else(|| self.nested(&["order", "order_id"]))
    }

    pub fn payment_id(&self) -> Option<String> {
        self.payment_id
            .clone()
            .or_else(|| self.nested(&["payment", "cf_payment_id"]))
    }

    pub fn payment_status(&self) -> Option<String> {
        self.payment_status
            .clone()
            .or_else(|| self.nested(&["payment", "payment_status"]))
    }

    fn nested(&self, path: &[&str]) -> Option<String> {
        let mut node = self.data.as_ref()?;
        for key in path {
            node = node.get(key)?;
        }
        value_to_string(node)
    }
}

/// Order-creation body sent to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateOrderPayload {
    pub order_id: String,
    pub order_amount: f64,
    pub order_currency: &'static str,
    pub customer_details: CustomerDetails,
    pub order_meta: OrderMeta,
    pub order_note: &'static str,
    pub order_tags: OrderTags,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerDetails {
    pub customer_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderMeta {
    pub return_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderTags {
    pub source: &'static str,
    pub platform: &'static str,
}

impl Default for OrderTags {
    fn default() -> Self {
        Self {
            source: "website",
            platform: "web",
        }
    }
}

// Storefronts and the gateway send ids and phone numbers as numbers or strings.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_string))
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

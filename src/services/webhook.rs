use crate::models::WebhookNotification;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{info, warn};

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-webhook-signature";
pub const TIMESTAMP_HEADER: &str = "x-webhook-timestamp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Success,
    Failed,
    /// Any other value, or none at all. Never a reason to reject.
    Other(Option<String>),
}

impl PaymentOutcome {
    pub fn classify(status: Option<&str>) -> Self {
        match status {
            Some("SUCCESS") => PaymentOutcome::Success,
            Some("FAILED") => PaymentOutcome::Failed,
            other => PaymentOutcome::Other(other.map(str::to_string)),
        }
    }
}

/// Logs the notification and reports how it was classified. The relay keeps
/// no state, so this is the whole of webhook processing for now.
pub fn process_notification(notification: &WebhookNotification) -> PaymentOutcome {
    let order_id = notification.order_id().unwrap_or_default();
    let status = notification.payment_status();
    let outcome = PaymentOutcome::classify(status.as_deref());

    match &outcome {
        PaymentOutcome::Success => {
            let payment_id = notification.payment_id().unwrap_or_default();
            // TODO: persist the order and send the confirmation mail once an order store exists.
            info!(order_id = %order_id, payment_id = %payment_id, "Payment successful");
        }
        PaymentOutcome::Failed => {
            warn!(order_id = %order_id, "Payment failed");
        }
        PaymentOutcome::Other(status) => {
            info!(
                order_id = %order_id,
                payment_status = status.as_deref().unwrap_or("<absent>"),
                order_status = notification.order_status.as_deref().unwrap_or("<absent>"),
                "Payment status update"
            );
        }
    }

    outcome
}

/// Signature the gateway puts in `x-webhook-signature`:
/// base64(HMAC-SHA256(secret, timestamp || raw body)).
pub fn compute_signature(secret: &[u8], timestamp: &str, body: &[u8]) -> String {
    STANDARD.encode(signed_mac(secret, timestamp, body).finalize().into_bytes())
}

/// Constant-time check of a received signature.
pub fn verify_signature(secret: &[u8], timestamp: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = STANDARD.decode(signature.trim()) else {
        return false;
    };
    signed_mac(secret, timestamp, body)
        .verify_slice(&expected)
        .is_ok()
}

fn signed_mac(secret: &[u8], timestamp: &str, body: &[u8]) -> HmacSha256 {
    let mut mac = <HmacSha256 as KeyInit>::new_from_slice(secret)
        .expect("HMAC accepts any key length");
    mac.update(timestamp.as_bytes());
    mac.update(body);
    mac
}

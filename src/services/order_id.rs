use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const PREFIX: &str = "ORDER";
const RANDOM_HEX_LEN: usize = 16;

/// `ORDER_<unix millis>_<16 hex chars>`. The suffix carries 64 random
/// bits from a v4 UUID, so two ids minted in the same millisecond
/// practically never collide.
pub fn generate_order_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let random = Uuid::new_v4().simple().to_string();

    format!("{}_{}_{}", PREFIX, millis, &random[..RANDOM_HEX_LEN])
}

// Utilitários para manipulação de valores monetários

use serde_json::Value;

/// Reads `order_amount` as sent by the storefront: a JSON number or a
/// numeric string. Zero, negative and non-finite amounts are rejected.
pub fn parse_order_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if amount.is_finite() && amount > 0.0 {
        Some(amount)
    } else {
        None
    }
}

pub fn format_currency(amount: f64, currency: &str) -> String {
    format!("{} {:.2}", currency, amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_parse_order_amount() {
        assert_eq!(parse_order_amount(&json!(499)), Some(499.0));
        assert_eq!(parse_order_amount(&json!(10.5)), Some(10.5));
        assert_eq!(parse_order_amount(&json!("250.75")), Some(250.75));
        assert_eq!(parse_order_amount(&json!(" 12 ")), Some(12.0));
    }

    #[test]
    fn test_parse_order_amount_rejects_falsy_values() {
        assert_eq!(parse_order_amount(&json!(0)), None);
        assert_eq!(parse_order_amount(&json!(-5)), None);
        assert_eq!(parse_order_amount(&json!("")), None);
        assert_eq!(parse_order_amount(&json!("abc")), None);
        assert_eq!(parse_order_amount(&json!("NaN")), None);
        assert_eq!(parse_order_amount(&json!("inf")), None);
        assert_eq!(parse_order_amount(&json!(null)), None);
        assert_eq!(parse_order_amount(&json!(true)), None);
        assert_eq!(parse_order_amount(&json!({"value": 1})), None);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1000.0, "INR"), "INR 1000.00");
        assert_eq!(format_currency(25.5, "INR"), "INR 25.50");
    }

    proptest! {
        #[test]
        fn positive_amounts_round_trip(amount in 0.01f64..1_000_000.0) {
            prop_assert_eq!(parse_order_amount(&json!(amount)), Some(amount));
        }

        #[test]
        fn non_positive_amounts_rejected(amount in -1_000_000.0f64..=0.0) {
            prop_assert_eq!(parse_order_amount(&json!(amount)), None);
        }
    }
}

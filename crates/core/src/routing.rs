//! Transaction routing classification.
//!
//! A transaction is labelled once, at creation, from its amount alone. The
//! label is stored with the transaction and never recomputed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Amount;

/// Amounts strictly above this value take the high-value route.
pub const HIGH_VALUE_THRESHOLD: Amount = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Processing lane a transaction is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    HighValue,
    Standard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Normal,
}

/// Routing label attached to a transaction, serialized as
/// `{"route": "...", "priority": "..."}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingInfo {
    pub route: Route,
    pub priority: Priority,
}

/// Classify an amount against [`HIGH_VALUE_THRESHOLD`].
pub fn classify(amount: Amount) -> RoutingInfo {
    if amount > HIGH_VALUE_THRESHOLD {
        RoutingInfo {
            route: Route::HighValue,
            priority: Priority::High,
        }
    } else {
        RoutingInfo {
            route: Route::Standard,
            priority: Priority::Normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn above_threshold_is_high_value() {
        let info = classify(Decimal::from(10_001));
        assert_eq!(info.route, Route::HighValue);
        assert_eq!(info.priority, Priority::High);
    }

    #[test]
    fn below_threshold_is_standard() {
        let info = classify(Decimal::from(9_999));
        assert_eq!(info.route, Route::Standard);
        assert_eq!(info.priority, Priority::Normal);
    }

    #[test]
    fn threshold_itself_is_standard() {
        assert_eq!(classify(HIGH_VALUE_THRESHOLD).route, Route::Standard);
    }

    #[test]
    fn fractional_amount_just_above_threshold() {
        let amount = Decimal::new(1_000_001, 2); // 10000.01
        assert_eq!(classify(amount).route, Route::HighValue);
    }

    #[test]
    fn serializes_as_snake_case_strings() {
        let json = serde_json::to_value(classify(Decimal::from(20_000))).unwrap();
        assert_eq!(json, serde_json::json!({"route": "high_value", "priority": "high"}));

        let json = serde_json::to_value(classify(Decimal::ONE)).unwrap();
        assert_eq!(json, serde_json::json!({"route": "standard", "priority": "normal"}));
    }
}

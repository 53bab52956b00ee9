//! Transaction entity model and DTOs.

use databridge_core::routing::RoutingInfo;
use databridge_core::status::TransactionStatus;
use databridge_core::types::{Amount, EntityId, Timestamp};
use serde::{Deserialize, Serialize};

use super::filter_value;

/// A transaction held in the `transactions` collection.
///
/// `routing_info` is fixed at creation and never recomputed.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub id: EntityId,
    pub origin_account: String,
    pub destination_account: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Amount,
    pub currency: String,
    pub transaction_type: String,
    pub description: Option<String>,
    pub reference_id: Option<String>,
    pub status: TransactionStatus,
    pub routing_info: RoutingInfo,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a transaction. Accounts are free-form strings.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransaction {
    pub origin_account: String,
    pub destination_account: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Amount,
    pub currency: String,
    pub transaction_type: String,
    pub description: Option<String>,
    pub reference_id: Option<String>,
}

/// Optional list filters (`?status=&type=`), compared by exact string match.
/// An empty value does not filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionFilter {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        filter_value(&self.status).map_or(true, |s| tx.status.as_str() == s)
            && filter_value(&self.transaction_type).map_or(true, |t| tx.transaction_type == t)
    }
}

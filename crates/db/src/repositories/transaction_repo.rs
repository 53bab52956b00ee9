//! Repository for the `transactions` collection.

use chrono::Utc;
use databridge_core::routing::classify;
use databridge_core::status::TransactionStatus;
use databridge_core::types::{new_id, EntityId};

use crate::models::transaction::{CreateTransaction, Transaction, TransactionFilter};
use crate::repositories::page_bounds;
use crate::store::MemoryStore;

/// Provides create/read/status operations for transactions.
///
/// Transactions are never removed; cancellation is a status change.
pub struct TransactionRepo;

impl TransactionRepo {
    /// Insert a new `pending` transaction, classifying its route once.
    ///
    /// The amount is not validated here; callers check it at the boundary.
    pub async fn create(store: &MemoryStore, input: &CreateTransaction) -> Transaction {
        let now = Utc::now();
        let tx = Transaction {
            id: new_id(),
            origin_account: input.origin_account.clone(),
            destination_account: input.destination_account.clone(),
            amount: input.amount,
            currency: input.currency.clone(),
            transaction_type: input.transaction_type.clone(),
            description: input.description.clone(),
            reference_id: input.reference_id.clone(),
            status: TransactionStatus::Pending,
            routing_info: classify(input.amount),
            created_at: now,
            updated_at: now,
        };
        tracing::debug!(id = %tx.id, route = ?tx.routing_info.route, "Transaction classified");
        store.transactions.insert(tx.id, tx).await
    }

    pub async fn find_by_id(store: &MemoryStore, id: EntityId) -> Option<Transaction> {
        store.transactions.get(&id).await
    }

    /// List transactions matching `filter`, in creation order.
    pub async fn list(
        store: &MemoryStore,
        filter: &TransactionFilter,
        skip: i64,
        limit: i64,
    ) -> Vec<Transaction> {
        let (skip, limit) = page_bounds(skip, limit);
        store
            .transactions
            .select(|tx| filter.matches(tx), skip, limit)
            .await
    }

    /// Overwrite the status. Any status may replace any other.
    ///
    /// Returns `None` if no transaction with the given `id` exists.
    pub async fn update_status(
        store: &MemoryStore,
        id: EntityId,
        status: TransactionStatus,
    ) -> Option<Transaction> {
        store
            .transactions
            .modify(&id, |tx| {
                tx.status = status;
                tx.updated_at = Utc::now();
            })
            .await
    }

    /// Mark a transaction `cancelled`.
    pub async fn cancel(store: &MemoryStore, id: EntityId) -> Option<Transaction> {
        Self::update_status(store, id, TransactionStatus::Cancelled).await
    }
}

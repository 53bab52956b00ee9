//! Process-lifetime entity collections.
//!
//! Each [`Collection`] is an insertion-ordered map behind its own async
//! `RwLock`. Writes to the same key resolve last-write-wins; nothing spans
//! more than one collection atomically.

use databridge_core::types::EntityId;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::models::client::Client;
use crate::models::data_record::DataRecord;
use crate::models::file_upload::FileUpload;
use crate::models::transaction::Transaction;

/// An insertion-ordered, concurrency-safe map of entities keyed by id.
#[derive(Debug)]
pub struct Collection<T> {
    rows: RwLock<IndexMap<EntityId, T>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(IndexMap::new()),
        }
    }
}

impl<T: Clone> Collection<T> {
    /// Insert `row` under `id`, replacing any previous value, and return it.
    ///
    /// A replaced key keeps its original position in iteration order.
    pub async fn insert(&self, id: EntityId, row: T) -> T {
        self.rows.write().await.insert(id, row.clone());
        row
    }

    pub async fn get(&self, id: &EntityId) -> Option<T> {
        self.rows.read().await.get(id).cloned()
    }

    /// Apply `f` to the row under `id` and return the updated row.
    ///
    /// Returns `None` without calling `f` if the key is absent.
    pub async fn modify<F>(&self, id: &EntityId, f: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(id)?;
        f(row);
        Some(row.clone())
    }

    /// Remove and return the row under `id`, preserving the order of the rest.
    pub async fn remove(&self, id: &EntityId) -> Option<T> {
        self.rows.write().await.shift_remove(id)
    }

    /// Rows matching `predicate`, in insertion order, after skipping `skip`
    /// matches and keeping at most `limit`.
    pub async fn select<P>(&self, predicate: P, skip: usize, limit: usize) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.rows
            .read()
            .await
            .values()
            .filter(|row| predicate(row))
            .skip(skip)
            .take(limit)
            .cloned()
            .collect()
    }

    /// All rows matching `predicate`, in insertion order.
    pub async fn select_all<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.select(predicate, 0, usize::MAX).await
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

/// All entity collections served by the API.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub clients: Collection<Client>,
    pub transactions: Collection<Transaction>,
    pub files: Collection<FileUpload>,
    pub records: Collection<DataRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use databridge_core::types::new_id;

    use super::*;

    #[tokio::test]
    async fn insert_then_get_returns_row() {
        let col = Collection::<String>::default();
        let id = new_id();
        col.insert(id, "a".into()).await;
        assert_eq!(col.get(&id).await.as_deref(), Some("a"));
        assert_eq!(col.len().await, 1);
    }

    #[tokio::test]
    async fn modify_missing_key_does_not_call_closure() {
        let col = Collection::<u32>::default();
        let result = col.modify(&new_id(), |_| panic!("must not run")).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn remove_preserves_order_of_remaining_rows() {
        let col = Collection::<u32>::default();
        let ids: Vec<_> = (0..4).map(|_| new_id()).collect();
        for (i, id) in ids.iter().enumerate() {
            col.insert(*id, i as u32).await;
        }
        assert_eq!(col.remove(&ids[1]).await, Some(1));
        assert_eq!(col.select_all(|_| true).await, vec![0, 2, 3]);
    }

    #[tokio::test]
    async fn select_filters_before_paginating() {
        let col = Collection::<u32>::default();
        for i in 0..10 {
            col.insert(new_id(), i).await;
        }
        let evens = col.select(|n| n % 2 == 0, 1, 2).await;
        assert_eq!(evens, vec![2, 4]);
    }

    #[tokio::test]
    async fn empty_collection_reports_empty() {
        let col = Collection::<u32>::default();
        assert!(col.is_empty().await);
        assert!(col.select_all(|_| true).await.is_empty());
    }
}

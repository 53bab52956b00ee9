//! Repository for the `clients` collection.

use chrono::Utc;
use databridge_core::types::{new_id, EntityId};

use crate::models::client::{Client, ClientInput};
use crate::repositories::page_bounds;
use crate::store::MemoryStore;

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client, returning the created row.
    pub async fn create(store: &MemoryStore, input: &ClientInput) -> Client {
        let now = Utc::now();
        let client = Client {
            id: new_id(),
            name: input.name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            tax_id: input.tax_id.clone(),
            created_at: now,
            updated_at: now,
        };
        store.clients.insert(client.id, client).await
    }

    pub async fn find_by_id(store: &MemoryStore, id: EntityId) -> Option<Client> {
        store.clients.get(&id).await
    }

    /// List clients in creation order.
    pub async fn list(store: &MemoryStore, skip: i64, limit: i64) -> Vec<Client> {
        let (skip, limit) = page_bounds(skip, limit);
        store.clients.select(|_| true, skip, limit).await
    }

    /// Overwrite every client-supplied field; `created_at` is kept.
    ///
    /// Returns `None` if no client with the given `id` exists.
    pub async fn replace(store: &MemoryStore, id: EntityId, input: &ClientInput) -> Option<Client> {
        store
            .clients
            .modify(&id, |client| {
                client.name = input.name.clone();
                client.email = input.email.clone();
                client.phone = input.phone.clone();
                client.tax_id = input.tax_id.clone();
                client.updated_at = Utc::now();
            })
            .await
    }

    /// Remove a client. Returns `true` if a row was removed.
    pub async fn delete(store: &MemoryStore, id: EntityId) -> bool {
        store.clients.remove(&id).await.is_some()
    }
}

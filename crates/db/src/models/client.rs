//! Client entity model and DTOs.

use databridge_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};

/// A client held in the `clients` collection.
#[derive(Debug, Clone, Serialize)]
pub struct Client {
    pub id: EntityId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tax_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a client or fully overwriting an existing one.
///
/// Omitted optional fields are cleared on overwrite.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tax_id: Option<String>,
}

/// All in-memory entities are keyed by a random (v4) UUID.
pub type EntityId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Monetary amounts use exact decimal arithmetic.
pub type Amount = rust_decimal::Decimal;

/// Generate a fresh entity identifier.
pub fn new_id() -> EntityId {
    uuid::Uuid::new_v4()
}

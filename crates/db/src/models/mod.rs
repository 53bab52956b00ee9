//! Entity structs and DTOs.
//!
//! Each submodule contains:
//! - A `Serialize` entity struct as stored and returned by the API
//! - A `Deserialize` input DTO for creates (and full overwrites)
//! - A `Deserialize` filter struct for list queries, where the entity has one

pub mod client;
pub mod data_record;
pub mod file_upload;
pub mod transaction;

/// A filter value from the query string; empty means "no filter".
pub(crate) fn filter_value(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

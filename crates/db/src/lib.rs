//! Storage layer for DataBridge.
//!
//! The API keeps its entities in [`store::MemoryStore`], a set of
//! process-lifetime collections with no durability across restarts.
//! [`postgres`] holds the connection helpers used by the operations tool to
//! diagnose and prepare a PostgreSQL server.

pub mod models;
pub mod postgres;
pub mod repositories;
pub mod store;

pub use store::MemoryStore;

//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&MemoryStore` as the first argument.

pub mod client_repo;
pub mod data_record_repo;
pub mod file_upload_repo;
pub mod transaction_repo;

pub use client_repo::ClientRepo;
pub use data_record_repo::DataRecordRepo;
pub use file_upload_repo::FileUploadRepo;
pub use transaction_repo::TransactionRepo;

/// Convert clamped skip/limit values into collection indices.
pub(crate) fn page_bounds(skip: i64, limit: i64) -> (usize, usize) {
    (
        usize::try_from(skip).unwrap_or(0),
        usize::try_from(limit).unwrap_or(0),
    )
}

//! Repository for the `records` collection. Records are read-only here;
//! they are created by [`FileUploadRepo::upload`](super::FileUploadRepo::upload).

use databridge_core::types::EntityId;

use crate::models::data_record::{DataRecord, RecordFilter};
use crate::store::MemoryStore;

pub struct DataRecordRepo;

impl DataRecordRepo {
    pub async fn find_by_id(store: &MemoryStore, id: EntityId) -> Option<DataRecord> {
        store.records.get(&id).await
    }

    /// List records matching `filter`, in creation order.
    pub async fn list(store: &MemoryStore, filter: &RecordFilter) -> Vec<DataRecord> {
        store.records.select_all(|r| filter.matches(r)).await
    }
}

//! Repository for the `files` collection.
//!
//! Uploading a file synthesizes its data records immediately; there is no
//! ingestion step.

use chrono::Utc;
use databridge_core::status::ProcessingStatus;
use databridge_core::types::{new_id, EntityId, Timestamp};
use serde_json::json;

use crate::models::data_record::DataRecord;
use crate::models::file_upload::{FileFilter, FileUpload, FileUploadInput};
use crate::store::MemoryStore;

/// Placeholder records created for every uploaded file.
pub const RECORDS_PER_FILE: usize = 3;

/// Provides upload and processing operations for files.
pub struct FileUploadRepo;

impl FileUploadRepo {
    /// Register every file in `inputs`, create its placeholder records, and
    /// mark it processed. Returns the uploads in request order.
    pub async fn upload(store: &MemoryStore, inputs: &[FileUploadInput]) -> Vec<FileUpload> {
        let mut uploaded = Vec::with_capacity(inputs.len());

        for input in inputs {
            let now = Utc::now();
            let file = FileUpload {
                id: new_id(),
                filename: input.filename.clone(),
                file_type: input.file_type.clone(),
                status: ProcessingStatus::Pending,
                created_at: now,
                processed_at: None,
            };
            let file_id = file.id;
            store.files.insert(file_id, file).await;

            for record in placeholder_records(file_id, now) {
                store.records.insert(record.id, record).await;
            }

            let processed = store
                .files
                .modify(&file_id, |file| {
                    file.status = ProcessingStatus::Processed;
                    file.processed_at = Some(Utc::now());
                })
                .await;

            tracing::debug!(%file_id, filename = %input.filename, "File registered");
            uploaded.extend(processed);
        }

        uploaded
    }

    pub async fn find_by_id(store: &MemoryStore, id: EntityId) -> Option<FileUpload> {
        store.files.get(&id).await
    }

    /// List files matching `filter`, in upload order.
    pub async fn list(store: &MemoryStore, filter: &FileFilter) -> Vec<FileUpload> {
        store.files.select_all(|file| filter.matches(file)).await
    }

    /// Run the (simulated) processing step for a file.
    ///
    /// Returns `None` if no file with the given `id` exists.
    pub async fn process(store: &MemoryStore, id: EntityId) -> Option<FileUpload> {
        store
            .files
            .modify(&id, |file| {
                // Simulated; completes immediately.
                file.status = ProcessingStatus::Processed;
                file.processed_at = Some(Utc::now());
            })
            .await
    }
}

/// Build the placeholder records for a freshly uploaded file.
fn placeholder_records(file_id: EntityId, created_at: Timestamp) -> Vec<DataRecord> {
    (1..=RECORDS_PER_FILE)
        .map(|i| DataRecord {
            id: new_id(),
            file_id,
            record_type: format!("record_type_{i}"),
            content: json!({
                "field1": format!("value{i}"),
                "field2": i + 9,
                "amount": 1000 * i,
            })
            .to_string(),
            status: ProcessingStatus::Processed,
            created_at,
        })
        .collect()
}

//! File upload entity model and DTOs.

use databridge_core::status::ProcessingStatus;
use databridge_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};

use super::filter_value;

/// An uploaded file's metadata. No file content is stored.
#[derive(Debug, Clone, Serialize)]
pub struct FileUpload {
    pub id: EntityId,
    pub filename: String,
    pub file_type: String,
    pub status: ProcessingStatus,
    pub created_at: Timestamp,
    pub processed_at: Option<Timestamp>,
}

/// One item of an upload request.
#[derive(Debug, Clone, Deserialize)]
pub struct FileUploadInput {
    pub filename: String,
    pub file_type: String,
}

/// Optional list filters (`?status=&file_type=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileFilter {
    pub status: Option<String>,
    pub file_type: Option<String>,
}

impl FileFilter {
    pub fn matches(&self, file: &FileUpload) -> bool {
        filter_value(&self.status).map_or(true, |s| file.status.as_str() == s)
            && filter_value(&self.file_type).map_or(true, |t| file.file_type == t)
    }
}

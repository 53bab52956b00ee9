//! Data record entity model and filter.

use databridge_core::status::ProcessingStatus;
use databridge_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};

use super::filter_value;

/// A record derived from an uploaded file.
///
/// `content` is free text that resembles JSON; it is never parsed.
#[derive(Debug, Clone, Serialize)]
pub struct DataRecord {
    pub id: EntityId,
    pub file_id: EntityId,
    pub record_type: String,
    pub content: String,
    pub status: ProcessingStatus,
    pub created_at: Timestamp,
}

/// Optional list filters (`?file_id=&record_type=`).
///
/// `file_id` is kept as text: a value that is not a UUID matches nothing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordFilter {
    pub file_id: Option<String>,
    pub record_type: Option<String>,
}

impl RecordFilter {
    pub fn matches(&self, record: &DataRecord) -> bool {
        filter_value(&self.file_id).map_or(true, |raw| {
            raw.parse::<EntityId>()
                .is_ok_and(|id| record.file_id == id)
        }) && filter_value(&self.record_type).map_or(true, |t| record.record_type == t)
    }
}

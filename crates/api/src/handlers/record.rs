//! Handlers for the read-only `/records` resource.

use axum::extract::State;
use axum::Json;
use databridge_db::models::data_record::{DataRecord, RecordFilter};
use databridge_db::repositories::DataRecordRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppPath, AppQuery, parse_id};
use crate::state::AppState;

/// GET /api/v1/records
pub async fn list(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<RecordFilter>,
) -> AppResult<Json<Vec<DataRecord>>> {
    Ok(Json(DataRecordRepo::list(&state.store, &filter).await))
}

/// GET /api/v1/records/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<DataRecord>> {
    let id = parse_id("Record", &id)?;
    let record = DataRecordRepo::find_by_id(&state.store, id)
        .await
        .ok_or(AppError::not_found("Record", id))?;
    Ok(Json(record))
}

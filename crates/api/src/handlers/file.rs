//! Handlers for the `/files` resource.

use axum::extract::State;
use axum::Json;
use databridge_db::models::file_upload::{FileFilter, FileUpload, FileUploadInput};
use databridge_db::repositories::FileUploadRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery, parse_id};
use crate::state::AppState;

/// GET /api/v1/files
pub async fn list(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<FileFilter>,
) -> AppResult<Json<Vec<FileUpload>>> {
    Ok(Json(FileUploadRepo::list(&state.store, &filter).await))
}

/// GET /api/v1/files/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<FileUpload>> {
    let id = parse_id("File", &id)?;
    let file = FileUploadRepo::find_by_id(&state.store, id)
        .await
        .ok_or(AppError::not_found("File", id))?;
    Ok(Json(file))
}

/// POST /api/v1/files/upload
///
/// Accepts a JSON array of `{filename, file_type}`; each file is registered
/// and its placeholder records generated before the response is sent.
pub async fn upload(
    State(state): State<AppState>,
    AppJson(inputs): AppJson<Vec<FileUploadInput>>,
) -> AppResult<Json<Vec<FileUpload>>> {
    let uploaded = FileUploadRepo::upload(&state.store, &inputs).await;
    tracing::info!(count = uploaded.len(), "Files uploaded");
    Ok(Json(uploaded))
}

/// POST /api/v1/files/{id}/process
pub async fn process(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<FileUpload>> {
    let id = parse_id("File", &id)?;
    let file = FileUploadRepo::process(&state.store, id)
        .await
        .ok_or(AppError::not_found("File", id))?;
    Ok(Json(file))
}

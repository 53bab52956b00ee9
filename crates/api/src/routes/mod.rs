pub mod clients;
pub mod files;
pub mod health;
pub mod records;
pub mod transactions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                           subsystem status payload
///
/// /clients                          list, create
/// /clients/{id}                     get, overwrite, delete
///
/// /transactions                     list (filter: status, type), create
/// /transactions/{id}                get, status update (?status=), cancel
/// /transactions/{id}/status         status update (JSON body)
///
/// /files                            list (filter: status, file_type)
/// /files/upload                     register files (POST)
/// /files/{id}                       get
/// /files/{id}/process               process (POST)
///
/// /records                          list (filter: file_id, record_type)
/// /records/{id}                     get
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::api_router())
        .nest("/clients", clients::router())
        .nest("/transactions", transactions::router())
        .nest("/files", files::router())
        .nest("/records", records::router())
}

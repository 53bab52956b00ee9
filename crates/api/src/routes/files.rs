//! Route definitions for the `/files` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::file;
use crate::state::AppState;

/// Routes mounted at `/files`.
///
/// ```text
/// GET    /                -> list
/// POST   /upload          -> upload
/// GET    /{id}            -> get_by_id
/// POST   /{id}/process    -> process
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(file::list))
        .route("/upload", post(file::upload))
        .route("/{id}", get(file::get_by_id))
        .route("/{id}/process", post(file::process))
}

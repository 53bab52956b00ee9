//! Route definitions for the `/transactions` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::transaction;
use crate::state::AppState;

/// Routes mounted at `/transactions`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// GET    /{id}           -> get_by_id
/// PUT    /{id}?status=   -> update_status_query
/// DELETE /{id}           -> cancel
/// PUT    /{id}/status    -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(transaction::list).post(transaction::create))
        .route(
            "/{id}",
            get(transaction::get_by_id)
                .put(transaction::update_status_query)
                .delete(transaction::cancel),
        )
        .route("/{id}/status", put(transaction::update_status))
}

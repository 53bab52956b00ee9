use axum::routing::get;
use axum::Router;

use crate::handlers::record;
use crate::state::AppState;

/// Routes mounted at `/records`.
///
/// ```text
/// GET /        -> list
/// GET /{id}    -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(record::list))
        .route("/{id}", get(record::get_by_id))
}

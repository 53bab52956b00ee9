//! Request extractors whose rejections render as [`AppError`] JSON bodies.
//!
//! axum's own `Json`, `Query` and `Path` reject with plain-text responses;
//! these wrappers route every rejection through `AppError` so clients always
//! see `{error, code}`.

use axum::extract::{FromRequest, FromRequestParts};
use databridge_core::types::EntityId;

use crate::error::{AppError, AppResult};

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Query string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Parse an entity id taken from the path.
///
/// An id that is not a UUID can never match a stored entity, so it is
/// reported as not found rather than as a malformed request.
pub fn parse_id(entity: &'static str, raw: &str) -> AppResult<EntityId> {
    raw.parse()
        .map_err(|_| AppError::not_found(entity, raw))
}

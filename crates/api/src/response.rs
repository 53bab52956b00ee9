//! Shared response types for API handlers.
//!
//! Entities are returned bare (no envelope). Operations that remove or
//! cancel something return a [`MessageResponse`].

use serde::Serialize;

/// `{ "message": "..." }` confirmation body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

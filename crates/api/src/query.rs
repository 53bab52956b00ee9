//! Shared query parameter types for API handlers.

use databridge_core::pagination::{clamp_limit, clamp_skip, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use serde::Deserialize;

/// Skip/limit pagination parameters (`?skip=&limit=`).
///
/// Values are clamped by [`ListParams::bounds`] before reaching a repository.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl ListParams {
    /// Clamped `(skip, limit)`.
    pub fn bounds(&self) -> (i64, i64) {
        (
            clamp_skip(self.skip),
            clamp_limit(self.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        )
    }
}

/// `?status=` on the transaction status update.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        assert_eq!(ListParams::default().bounds(), (0, 100));
    }

    #[test]
    fn negative_and_oversized_values_are_clamped() {
        let params = ListParams {
            skip: Some(-5),
            limit: Some(10_000),
        };
        assert_eq!(params.bounds(), (0, 1000));
    }
}

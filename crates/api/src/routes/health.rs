use axum::extract::State;
use axum::{routing::get, Json, Router};
use chrono::Utc;
use databridge_core::types::Timestamp;
use serde::Serialize;

use crate::state::AppState;

/// Display name reported by the welcome and health payloads.
pub const SERVICE_NAME: &str = "DataBridge Bank API";

/// Welcome payload served at `/`.
#[derive(Serialize)]
pub struct WelcomeResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub timestamp: Timestamp,
}

/// Liveness payload served at `/health`.
#[derive(Serialize)]
pub struct LivenessResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct DatabaseStatus {
    pub postgres: &'static str,
    pub mongodb: &'static str,
}

#[derive(Serialize)]
pub struct MessagingStatus {
    pub kafka: &'static str,
}

/// Subsystem payload served at `/api/v1/health`.
///
/// Values come from feature flags only; nothing is probed.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: DatabaseStatus,
    pub graphql: &'static str,
    pub messaging: MessagingStatus,
    pub timestamp: Timestamp,
}

fn subsystem(enabled: bool) -> &'static str {
    if enabled {
        "online"
    } else {
        "disabled"
    }
}

/// GET / -- welcome payload.
async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        name: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        status: "online",
        timestamp: Utc::now(),
    })
}

/// GET /health -- process liveness.
async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/v1/health -- subsystem status.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let features = state.config.features;

    Json(HealthResponse {
        status: "online",
        version: env!("CARGO_PKG_VERSION"),
        database: DatabaseStatus {
            postgres: subsystem(features.postgres),
            mongodb: subsystem(features.mongodb),
        },
        graphql: subsystem(features.graphql),
        messaging: MessagingStatus {
            kafka: subsystem(features.kafka),
        },
        timestamp: Utc::now(),
    })
}

/// Mount the welcome and liveness routes (root level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(liveness))
}

/// Mount the subsystem health route under `/api/v1`.
pub fn api_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

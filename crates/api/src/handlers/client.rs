//! Handlers for the `/clients` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use databridge_db::models::client::{Client, ClientInput};
use databridge_db::repositories::ClientRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery, parse_id};
use crate::query::ListParams;
use crate::response::MessageResponse;
use crate::state::AppState;

/// POST /api/v1/clients
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<ClientInput>,
) -> AppResult<(StatusCode, Json<Client>)> {
    let client = ClientRepo::create(&state.store, &input).await;
    tracing::info!(id = %client.id, "Client created");
    Ok((StatusCode::CREATED, Json(client)))
}

/// GET /api/v1/clients
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
) -> AppResult<Json<Vec<Client>>> {
    let (skip, limit) = params.bounds();
    Ok(Json(ClientRepo::list(&state.store, skip, limit).await))
}

/// GET /api/v1/clients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<Client>> {
    let id = parse_id("Client", &id)?;
    let client = ClientRepo::find_by_id(&state.store, id)
        .await
        .ok_or(AppError::not_found("Client", id))?;
    Ok(Json(client))
}

/// PUT /api/v1/clients/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(input): AppJson<ClientInput>,
) -> AppResult<Json<Client>> {
    let id = parse_id("Client", &id)?;
    let client = ClientRepo::replace(&state.store, id, &input)
        .await
        .ok_or(AppError::not_found("Client", id))?;
    Ok(Json(client))
}

/// DELETE /api/v1/clients/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id("Client", &id)?;
    if ClientRepo::delete(&state.store, id).await {
        tracing::info!(%id, "Client removed");
        Ok(Json(MessageResponse::new(format!(
            "Client {id} removed successfully"
        ))))
    } else {
        Err(AppError::not_found("Client", id))
    }
}

//! Handlers for the `/transactions` resource.
//!
//! A transaction's status is any member of the fixed enumeration; there is
//! no transition table, so terminal statuses may be overwritten.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use databridge_core::status::TransactionStatus;
use databridge_core::types::EntityId;
use databridge_core::validation::validate_positive_amount;
use databridge_db::models::transaction::{CreateTransaction, Transaction, TransactionFilter};
use databridge_db::repositories::TransactionRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery, parse_id};
use crate::query::{ListParams, StatusQuery};
use crate::response::MessageResponse;
use crate::state::AppState;

/// Request body for `PUT /transactions/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// POST /api/v1/transactions
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateTransaction>,
) -> AppResult<(StatusCode, Json<Transaction>)> {
    validate_positive_amount(input.amount, "amount")?;

    let tx = TransactionRepo::create(&state.store, &input).await;
    tracing::info!(
        id = %tx.id,
        amount = %tx.amount,
        route = ?tx.routing_info.route,
        "Transaction created"
    );
    Ok((StatusCode::CREATED, Json(tx)))
}

/// GET /api/v1/transactions
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListParams>,
    AppQuery(filter): AppQuery<TransactionFilter>,
) -> AppResult<Json<Vec<Transaction>>> {
    let (skip, limit) = params.bounds();
    Ok(Json(
        TransactionRepo::list(&state.store, &filter, skip, limit).await,
    ))
}

/// GET /api/v1/transactions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<Transaction>> {
    let id = parse_id("Transaction", &id)?;
    let tx = TransactionRepo::find_by_id(&state.store, id)
        .await
        .ok_or(AppError::not_found("Transaction", id))?;
    Ok(Json(tx))
}

/// PUT /api/v1/transactions/{id}?status=
pub async fn update_status_query(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppQuery(query): AppQuery<StatusQuery>,
) -> AppResult<Json<Transaction>> {
    let id = parse_id("Transaction", &id)?;
    let status = query
        .status
        .ok_or_else(|| AppError::BadRequest("Missing required query parameter 'status'".into()))?;
    apply_status(&state, id, &status).await.map(Json)
}

/// PUT /api/v1/transactions/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(body): AppJson<StatusUpdate>,
) -> AppResult<Json<Transaction>> {
    let id = parse_id("Transaction", &id)?;
    apply_status(&state, id, &body.status).await.map(Json)
}

/// DELETE /api/v1/transactions/{id}
///
/// Cancels rather than removes; the transaction stays readable.
pub async fn cancel(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id("Transaction", &id)?;
    TransactionRepo::cancel(&state.store, id)
        .await
        .ok_or(AppError::not_found("Transaction", id))?;
    tracing::info!(%id, "Transaction cancelled");
    Ok(Json(MessageResponse::new(format!(
        "Transaction {id} cancelled successfully"
    ))))
}

/// Existence is checked before the status value, so an unknown id wins over
/// an invalid status.
async fn apply_status(state: &AppState, id: EntityId, raw: &str) -> AppResult<Transaction> {
    if TransactionRepo::find_by_id(&state.store, id).await.is_none() {
        return Err(AppError::not_found("Transaction", id));
    }
    let status: TransactionStatus = raw.parse()?;

    let tx = TransactionRepo::update_status(&state.store, id, status)
        .await
        .ok_or(AppError::not_found("Transaction", id))?;
    tracing::info!(%id, %status, "Transaction status updated");
    Ok(tx)
}

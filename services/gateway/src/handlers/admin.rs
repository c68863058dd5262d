//! Teacher endpoints

use crate::error::AppError;
use crate::models::MessageResponse;
use crate::state::AppState;
use axum::{extract::State, Json};
use ledger::AdminStats;
use types::account::PublicUser;

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<PublicUser>>, AppError> {
    let users = state.read(|ledger| Ok(ledger.users())).await?;
    Ok(Json(users))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<AdminStats>, AppError> {
    let stats = state.read(|ledger| Ok(ledger.compute_stats())).await?;
    Ok(Json(stats))
}

pub async fn reset(State(state): State<AppState>) -> Result<Json<MessageResponse>, AppError> {
    let outcome = state.write(|ledger| ledger.reset()).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: outcome.message,
    }))
}

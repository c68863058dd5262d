use crate::error::AppError;
use crate::models::{ApiJson, ApiPath, UserResponse};
use crate::state::AppState;
use axum::{extract::State, Json};
use ledger::{Credentials, Registration};
use types::account::PublicUser;
use types::ids::UserId;

pub async fn login(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.read(|ledger| ledger.login(&credentials)).await?;
    Ok(Json(UserResponse { success: true, user }))
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(registration): ApiJson<Registration>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.write(move |ledger| ledger.register(registration)).await?;
    Ok(Json(UserResponse { success: true, user }))
}

pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<PublicUser>, AppError> {
    let user = state.read(|ledger| ledger.user(&user_id)).await?;
    Ok(Json(user))
}

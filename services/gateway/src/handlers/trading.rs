//! Purchases, market trades and the records they leave

use crate::error::AppError;
use crate::models::{ApiJson, ApiPath, PurchaseResponse, TradeResponse};
use crate::state::AppState;
use axum::{extract::State, Json};
use ledger::{PurchaseRequest, TradeRequest};
use types::ids::UserId;
use types::market::MarketSnapshot;
use types::position::Portfolio;
use types::transaction::Transaction;

pub async fn purchase(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PurchaseRequest>,
) -> Result<Json<PurchaseResponse>, AppError> {
    let receipt = state
        .write(move |ledger| ledger.execute_purchase(&request))
        .await?;
    Ok(Json(PurchaseResponse {
        success: true,
        receipt,
    }))
}

pub async fn trade(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TradeRequest>,
) -> Result<Json<TradeResponse>, AppError> {
    let receipt = state
        .write(move |ledger| ledger.execute_trade(&request))
        .await?;
    Ok(Json(TradeResponse {
        success: true,
        receipt,
    }))
}

pub async fn get_market(State(state): State<AppState>) -> Result<Json<MarketSnapshot>, AppError> {
    let market = state.read(|ledger| Ok(ledger.market().clone())).await?;
    Ok(Json(market))
}

/// Manual tick, same step the background ticker runs
pub async fn update_market(State(state): State<AppState>) -> Result<Json<MarketSnapshot>, AppError> {
    let (_, market) = state.tick_market().await?;
    Ok(Json(market))
}

pub async fn list_transactions(State(state): State<AppState>) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = state.read(|ledger| Ok(ledger.transactions().to_vec())).await?;
    Ok(Json(transactions))
}

pub async fn user_transactions(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = state
        .read(|ledger| Ok(ledger.transactions_for(&user_id)))
        .await?;
    Ok(Json(transactions))
}

pub async fn portfolio(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<Portfolio>, AppError> {
    let portfolio = state.read(|ledger| ledger.portfolio_for(&user_id)).await?;
    Ok(Json(portfolio))
}

//! Storefront and product endpoints

use crate::error::AppError;
use crate::models::{ApiJson, ApiPath, BusinessResponse, ProductResponse, SuccessResponse};
use crate::state::AppState;
use axum::{extract::State, Json};
use types::business::{Business, BusinessDraft, BusinessPatch, ProductDraft, ProductPatch};
use types::ids::{BusinessId, ProductId, UserId};

pub async fn list_businesses(State(state): State<AppState>) -> Result<Json<Vec<Business>>, AppError> {
    let businesses = state.read(|ledger| Ok(ledger.businesses().to_vec())).await?;
    Ok(Json(businesses))
}

pub async fn get_business(
    State(state): State<AppState>,
    ApiPath(business_id): ApiPath<BusinessId>,
) -> Result<Json<Business>, AppError> {
    let business = state
        .read(|ledger| ledger.business(&business_id).cloned())
        .await?;
    Ok(Json(business))
}

pub async fn businesses_by_owner(
    State(state): State<AppState>,
    ApiPath(owner_id): ApiPath<UserId>,
) -> Result<Json<Vec<Business>>, AppError> {
    let businesses = state
        .read(|ledger| Ok(ledger.businesses_by_owner(&owner_id)))
        .await?;
    Ok(Json(businesses))
}

pub async fn create_business(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<BusinessDraft>,
) -> Result<Json<BusinessResponse>, AppError> {
    let business = state.write(move |ledger| ledger.create_business(draft)).await?;
    Ok(Json(BusinessResponse {
        success: true,
        business,
    }))
}

pub async fn update_business(
    State(state): State<AppState>,
    ApiPath(business_id): ApiPath<BusinessId>,
    ApiJson(patch): ApiJson<BusinessPatch>,
) -> Result<Json<BusinessResponse>, AppError> {
    let business = state
        .write(move |ledger| ledger.update_business(&business_id, patch))
        .await?;
    Ok(Json(BusinessResponse {
        success: true,
        business,
    }))
}

pub async fn delete_business(
    State(state): State<AppState>,
    ApiPath(business_id): ApiPath<BusinessId>,
) -> Result<Json<SuccessResponse>, AppError> {
    state
        .write(move |ledger| ledger.delete_business(&business_id))
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

pub async fn add_product(
    State(state): State<AppState>,
    ApiPath(business_id): ApiPath<BusinessId>,
    ApiJson(draft): ApiJson<ProductDraft>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = state
        .write(move |ledger| ledger.add_product(&business_id, draft))
        .await?;
    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}

pub async fn update_product(
    State(state): State<AppState>,
    ApiPath((business_id, product_id)): ApiPath<(BusinessId, ProductId)>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = state
        .write(move |ledger| ledger.update_product(&business_id, &product_id, patch))
        .await?;
    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}

pub async fn delete_product(
    State(state): State<AppState>,
    ApiPath((business_id, product_id)): ApiPath<(BusinessId, ProductId)>,
) -> Result<Json<SuccessResponse>, AppError> {
    state
        .write(move |ledger| ledger.delete_product(&business_id, &product_id))
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

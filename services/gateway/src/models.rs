use crate::error::AppError;
use axum::extract::{FromRequest, FromRequestParts};
use ledger::{PurchaseReceipt, TradeReceipt};
use serde::Serialize;
use types::account::PublicUser;
use types::business::{Business, Product};

/// JSON body extractor whose rejections use the API error shape
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections use the API error shape
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: PublicUser,
}

#[derive(Debug, Clone, Serialize)]
pub struct BusinessResponse {
    pub success: bool,
    pub business: Business,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseResponse {
    pub success: bool,
    #[serde(flatten)]
    pub receipt: PurchaseReceipt,
}

#[derive(Debug, Clone, Serialize)]
pub struct TradeResponse {
    pub success: bool,
    #[serde(flatten)]
    pub receipt: TradeReceipt,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

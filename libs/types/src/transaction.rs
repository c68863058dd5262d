//! Ledger records
//!
//! Every successful purchase or trade appends exactly one `Transaction`.
//! Records are immutable: `total_amount` is fixed at `quantity × unit price`
//! when the record is created and names are copied in, never re-derived.
//!
//! On the wire the record is tagged by `type`: `purchase`, `buy` or `sell`.

use crate::errors::DomainError;
use crate::ids::{BusinessId, ProductId, TransactionId, UserId};
use crate::market::AssetClass;
use crate::numeric::line_total;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a market trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

/// A student buying a product from another student's business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    pub id: TransactionId,
    pub buyer_id: UserId,
    pub buyer_name: String,
    pub seller_id: UserId,
    pub seller_name: String,
    pub business_id: BusinessId,
    pub business_name: String,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub price_per_unit: Decimal,
    pub total_amount: Decimal,
    #[serde(with = "crate::timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// A user buying or selling a market asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub id: TransactionId,
    pub user_id: UserId,
    pub user_name: String,
    pub asset_type: AssetClass,
    pub symbol: String,
    pub asset_name: String,
    pub quantity: u32,
    pub price: Decimal,
    pub total_amount: Decimal,
    #[serde(with = "crate::timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// One entry of the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Transaction {
    Purchase(PurchaseRecord),
    Buy(TradeRecord),
    Sell(TradeRecord),
}

/// Denormalized purchase details captured at the moment of sale
#[derive(Debug, Clone)]
pub struct PurchaseDetails {
    pub buyer_id: UserId,
    pub buyer_name: String,
    pub seller_id: UserId,
    pub seller_name: String,
    pub business_id: BusinessId,
    pub business_name: String,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub price_per_unit: Decimal,
}

/// Trade details captured at execution
#[derive(Debug, Clone)]
pub struct TradeDetails {
    pub user_id: UserId,
    pub user_name: String,
    pub asset_type: AssetClass,
    pub symbol: String,
    pub asset_name: String,
    pub quantity: u32,
    pub price: Decimal,
}

impl Transaction {
    /// Record a purchase, fixing its total now
    pub fn purchase(details: PurchaseDetails, timestamp: DateTime<Utc>) -> Result<Self, DomainError> {
        let total_amount =
            line_total(details.price_per_unit, details.quantity).ok_or(DomainError::AmountOverflow)?;
        Ok(Transaction::Purchase(PurchaseRecord {
            id: TransactionId::new(),
            total_amount,
            buyer_id: details.buyer_id,
            buyer_name: details.buyer_name,
            seller_id: details.seller_id,
            seller_name: details.seller_name,
            business_id: details.business_id,
            business_name: details.business_name,
            product_id: details.product_id,
            product_name: details.product_name,
            quantity: details.quantity,
            price_per_unit: details.price_per_unit,
            timestamp,
        }))
    }

    /// Record a trade, fixing its total now
    pub fn trade(
        action: TradeAction,
        details: TradeDetails,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let total_amount = line_total(details.price, details.quantity).ok_or(DomainError::AmountOverflow)?;
        let record = TradeRecord {
            id: TransactionId::new(),
            total_amount,
            user_id: details.user_id,
            user_name: details.user_name,
            asset_type: details.asset_type,
            symbol: details.symbol,
            asset_name: details.asset_name,
            quantity: details.quantity,
            price: details.price,
            timestamp,
        };
        Ok(match action {
            TradeAction::Buy => Transaction::Buy(record),
            TradeAction::Sell => Transaction::Sell(record),
        })
    }

    pub fn id(&self) -> &TransactionId {
        match self {
            Transaction::Purchase(p) => &p.id,
            Transaction::Buy(t) | Transaction::Sell(t) => &t.id,
        }
    }

    pub fn total_amount(&self) -> Decimal {
        match self {
            Transaction::Purchase(p) => p.total_amount,
            Transaction::Buy(t) | Transaction::Sell(t) => t.total_amount,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Transaction::Purchase(p) => p.timestamp,
            Transaction::Buy(t) | Transaction::Sell(t) => t.timestamp,
        }
    }

    pub fn is_purchase(&self) -> bool {
        matches!(self, Transaction::Purchase(_))
    }

    pub fn is_trade(&self) -> bool {
        matches!(self, Transaction::Buy(_) | Transaction::Sell(_))
    }

    /// The trade record and its direction, if this is a trade
    pub fn as_trade(&self) -> Option<(TradeAction, &TradeRecord)> {
        match self {
            Transaction::Buy(t) => Some((TradeAction::Buy, t)),
            Transaction::Sell(t) => Some((TradeAction::Sell, t)),
            Transaction::Purchase(_) => None,
        }
    }

    /// Whether `user_id` took part as buyer, seller or trader
    pub fn involves(&self, user_id: &UserId) -> bool {
        match self {
            Transaction::Purchase(p) => &p.buyer_id == user_id || &p.seller_id == user_id,
            Transaction::Buy(t) | Transaction::Sell(t) => &t.user_id == user_id,
        }
    }
}

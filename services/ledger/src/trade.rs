//! Buying and selling simulated market assets

use chrono::{DateTime, Utc};
use persistence::Dataset;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::errors::{require_positive_quantity, DomainError};
use types::ids::UserId;
use types::market::AssetClass;
use types::numeric::line_total;
use types::transaction::{TradeAction, TradeDetails, Transaction};

use crate::error::LedgerError;
use crate::holdings::net_quantity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
    pub user_id: UserId,
    pub asset_type: AssetClass,
    pub symbol: String,
    pub action: TradeAction,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeReceipt {
    pub transaction: Transaction,
    pub new_balance: Decimal,
}

/// Apply a trade at the current market price
pub fn apply_trade(
    state: &mut Dataset,
    request: &TradeRequest,
    allow_naked_short_selling: bool,
    now: DateTime<Utc>,
) -> Result<TradeReceipt, LedgerError> {
    let user_idx = state
        .users
        .iter()
        .position(|u| u.id == request.user_id)
        .ok_or_else(|| LedgerError::UserNotFound(request.user_id.clone()))?;
    let asset = state
        .market
        .find(request.asset_type, &request.symbol)
        .ok_or_else(|| LedgerError::AssetNotFound {
            class: request.asset_type,
            symbol: request.symbol.clone(),
        })?;
    let quantity = require_positive_quantity(request.quantity)?;
    let total = line_total(asset.price, quantity);

    let user = &state.users[user_idx];
    let details = TradeDetails {
        user_id: user.id.clone(),
        user_name: user.name.clone(),
        asset_type: request.asset_type,
        symbol: asset.symbol.clone(),
        asset_name: asset.name.clone(),
        quantity,
        price: asset.price,
    };

    match request.action {
        TradeAction::Buy => {
            // A total past the Decimal range is beyond any balance
            let total = total.ok_or(DomainError::InsufficientFunds {
                required: Decimal::MAX,
                available: user.balance,
            })?;
            state.users[user_idx].debit(total)?
        }
        TradeAction::Sell => {
            let total = total.ok_or(DomainError::AmountOverflow)?;
            if !allow_naked_short_selling {
                let held = net_quantity(&state.transactions, &request.user_id, request.asset_type, &request.symbol);
                if held < i64::from(quantity) {
                    return Err(DomainError::InsufficientHoldings {
                        symbol: request.symbol.clone(),
                        requested: quantity,
                        held,
                    }
                    .into());
                }
            }
            state.users[user_idx].credit(total)?;
        }
    }

    let transaction = Transaction::trade(request.action, details, now)?;
    state.transactions.push(transaction.clone());

    Ok(TradeReceipt {
        transaction,
        new_balance: state.users[user_idx].balance,
    })
}

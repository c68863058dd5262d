//! Holdings and portfolio valuation
//!
//! Positions are never stored. They are folded out of a user's buy/sell
//! records on every read, so they cannot drift from the ledger.

use crate::market::{AssetClass, MarketSnapshot};
use crate::numeric::percent_of;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Net position in one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub asset_type: AssetClass,
    pub symbol: String,
    pub name: String,
    pub quantity: i64,
    /// Sum of buy totals minus sum of sell totals
    pub total_cost: Decimal,
    pub average_price: Decimal,
}

impl Holding {
    /// Build from folded totals. `quantity` must be positive.
    pub fn from_totals(
        asset_type: AssetClass,
        symbol: String,
        name: String,
        quantity: i64,
        total_cost: Decimal,
    ) -> Self {
        debug_assert!(quantity > 0, "holdings are only built for open positions");
        let average_price = total_cost / Decimal::from(quantity);
        Self {
            asset_type,
            symbol,
            name,
            quantity,
            total_cost,
            average_price,
        }
    }

    /// Value this holding against the current market
    pub fn valued_at(self, market: &MarketSnapshot) -> HoldingValuation {
        // An asset that left the market is worth nothing
        let current_price = market
            .find(self.asset_type, &self.symbol)
            .map(|a| a.price)
            .unwrap_or(Decimal::ZERO);
        let market_value = current_price * Decimal::from(self.quantity);
        let profit_loss = market_value - self.total_cost;
        let profit_loss_percent = percent_of(profit_loss, self.total_cost);
        HoldingValuation {
            holding: self,
            current_price,
            market_value,
            profit_loss,
            profit_loss_percent,
        }
    }
}

/// A holding together with its mark-to-market figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingValuation {
    #[serde(flatten)]
    pub holding: Holding,
    pub current_price: Decimal,
    pub market_value: Decimal,
    pub profit_loss: Decimal,
    pub profit_loss_percent: Decimal,
}

/// Cash plus valued holdings for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub cash_balance: Decimal,
    pub investments_value: Decimal,
    pub total_value: Decimal,
    pub holdings: Vec<HoldingValuation>,
}

impl Portfolio {
    pub fn new(cash_balance: Decimal, holdings: Vec<HoldingValuation>) -> Self {
        let investments_value: Decimal = holdings.iter().map(|h| h.market_value).sum();
        Self {
            cash_balance,
            investments_value,
            total_value: cash_balance + investments_value,
            holdings,
        }
    }
}

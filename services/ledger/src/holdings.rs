//! Holdings derivation
//!
//! Positions are folded from the trade records on every read: buys add
//! quantity and cost, sells subtract both, and only positions with a
//! positive quantity remain. Output is sorted by asset class then symbol,
//! so it does not depend on the order of the records.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use types::ids::UserId;
use types::market::{AssetClass, MarketSnapshot};
use types::position::{Holding, Portfolio};
use types::transaction::{TradeAction, Transaction};

struct Totals {
    name: String,
    quantity: i64,
    cost: Decimal,
}

fn fold_trades<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    user_id: &UserId,
) -> BTreeMap<(AssetClass, String), Totals> {
    let mut totals: BTreeMap<(AssetClass, String), Totals> = BTreeMap::new();
    for (action, trade) in transactions.into_iter().filter_map(Transaction::as_trade) {
        if &trade.user_id != user_id {
            continue;
        }
        let entry = totals
            .entry((trade.asset_type, trade.symbol.clone()))
            .or_insert_with(|| Totals {
                name: trade.asset_name.clone(),
                quantity: 0,
                cost: Decimal::ZERO,
            });
        let quantity = i64::from(trade.quantity);
        match action {
            TradeAction::Buy => {
                entry.quantity += quantity;
                entry.cost += trade.total_amount;
            }
            TradeAction::Sell => {
                entry.quantity -= quantity;
                entry.cost -= trade.total_amount;
            }
        }
    }
    totals
}

/// Open positions of `user_id`
pub fn derive_holdings(transactions: &[Transaction], user_id: &UserId) -> Vec<Holding> {
    fold_trades(transactions, user_id)
        .into_iter()
        .filter(|(_, t)| t.quantity > 0)
        .map(|((class, symbol), t)| Holding::from_totals(class, symbol, t.name, t.quantity, t.cost))
        .collect()
}

/// Net quantity of one asset, possibly negative after naked sells
pub fn net_quantity(
    transactions: &[Transaction],
    user_id: &UserId,
    class: AssetClass,
    symbol: &str,
) -> i64 {
    fold_trades(transactions, user_id)
        .get(&(class, symbol.to_string()))
        .map(|t| t.quantity)
        .unwrap_or(0)
}

/// Cash plus holdings valued at current prices
pub fn value_portfolio(
    cash_balance: Decimal,
    transactions: &[Transaction],
    user_id: &UserId,
    market: &MarketSnapshot,
) -> Portfolio {
    let holdings = derive_holdings(transactions, user_id)
        .into_iter()
        .map(|h| h.valued_at(market))
        .collect();
    Portfolio::new(cash_balance, holdings)
}

//! Teacher-facing statistics and reset

use persistence::Dataset;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shown when there are no businesses to rank
pub const NO_CATEGORY: &str = "None";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_students: usize,
    pub total_businesses: usize,
    pub total_revenue: Decimal,
    /// Purchase records
    pub total_transactions: usize,
    /// Buy and sell records
    pub total_trades: usize,
    pub most_popular_category: String,
    pub category_breakdown: BTreeMap<String, usize>,
}

/// Highest count wins; ties go to the smallest category name
fn most_popular(breakdown: &BTreeMap<String, usize>) -> String {
    breakdown
        .iter()
        // Names compared reversed so the smaller one ranks higher on a tie
        .max_by(|(a_name, a_count), (b_name, b_count)| {
            a_count.cmp(b_count).then_with(|| b_name.cmp(a_name))
        })
        .map(|(name, _)| name.clone())
        .unwrap_or_else(|| NO_CATEGORY.to_string())
}

pub fn compute_stats(state: &Dataset) -> AdminStats {
    let mut category_breakdown: BTreeMap<String, usize> = BTreeMap::new();
    for business in &state.businesses {
        *category_breakdown.entry(business.category.clone()).or_insert(0) += 1;
    }

    AdminStats {
        total_students: state.users.iter().filter(|u| u.is_student()).count(),
        total_businesses: state.businesses.len(),
        total_revenue: state.businesses.iter().map(|b| b.revenue).sum(),
        total_transactions: state.transactions.iter().filter(|t| t.is_purchase()).count(),
        total_trades: state.transactions.iter().filter(|t| t.is_trade()).count(),
        most_popular_category: most_popular(&category_breakdown),
        category_breakdown,
    }
}

/// Students back to `initial_balance`, no businesses, no transactions.
/// Teachers and the market are left alone.
pub fn reset_dataset(state: &mut Dataset, initial_balance: Decimal) {
    for user in state.users.iter_mut().filter(|u| u.is_student()) {
        user.balance = initial_balance;
    }
    state.businesses.clear();
    state.transactions.clear();
}

//! Money arithmetic helpers
//!
//! Balances, prices and revenue are `Decimal` so that `price × quantity` is
//! exact. The JSON documents still carry plain numbers.

use rust_decimal::Decimal;

/// Cash every student starts with, and is reset to.
pub const INITIAL_STUDENT_BALANCE: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Decimal places kept on simulated market prices.
pub const PRICE_DP: u32 = 8;

/// Decimal places kept on the recorded percentage change of a tick.
pub const CHANGE_DP: u32 = 6;

/// Total for `quantity` units at `unit_price`, `None` if it does not fit in a `Decimal`.
pub fn line_total(unit_price: Decimal, quantity: u32) -> Option<Decimal> {
    unit_price.checked_mul(Decimal::from(quantity))
}

/// `part / whole × 100`, or zero when `whole` is zero.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        part / whole * Decimal::ONE_HUNDRED
    }
}

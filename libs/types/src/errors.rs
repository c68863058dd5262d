//! Domain errors
//!
//! Raised by the types themselves when a request would break an invariant.
//! Funds and holdings shortfalls are business-rule rejections: the client is
//! told `success: false`, nothing else went wrong.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Quantity must be a positive whole number")]
    InvalidQuantity,

    #[error("Invalid price: {price}")]
    InvalidPrice { price: String },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    #[error("Amount is too large")]
    AmountOverflow,

    #[error("Insufficient holdings of {symbol}: requested {requested}, held {held}")]
    InsufficientHoldings {
        symbol: String,
        requested: u32,
        held: i64,
    },
}

impl DomainError {
    /// Business-rule rejections, as opposed to malformed requests
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            DomainError::InsufficientFunds { .. }
                | DomainError::InsufficientHoldings { .. }
                | DomainError::AmountOverflow
        )
    }

    /// Short message shown to the student
    pub fn user_message(&self) -> String {
        match self {
            DomainError::InsufficientFunds { .. } => "Insufficient funds".to_string(),
            DomainError::InsufficientHoldings { symbol, .. } => {
                format!("You do not hold enough {symbol} to sell")
            }
            other => other.to_string(),
        }
    }
}

/// Validate a purchase or trade quantity
pub fn require_positive_quantity(quantity: u32) -> Result<u32, DomainError> {
    if quantity == 0 {
        Err(DomainError::InvalidQuantity)
    } else {
        Ok(quantity)
    }
}

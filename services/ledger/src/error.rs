//! Ledger errors
//!
//! Three kinds of failure reach a caller: a record that does not exist, a
//! request the rules refuse (`is_rejection`), and anything else, which is
//! either malformed input or a store failure.

use persistence::StoreError;
use thiserror::Error;
use types::errors::DomainError;
use types::ids::{BusinessId, ProductId, UserId};
use types::market::AssetClass;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Business not found: {0}")]
    BusinessNotFound(BusinessId),

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("Asset not found: {class} {symbol}")]
    AssetNotFound { class: AssetClass, symbol: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LedgerError::UserNotFound(_)
                | LedgerError::BusinessNotFound(_)
                | LedgerError::ProductNotFound(_)
                | LedgerError::AssetNotFound { .. }
        )
    }

    /// Refused by a business rule; nothing was changed
    pub fn is_rejection(&self) -> bool {
        match self {
            LedgerError::InvalidCredentials | LedgerError::UsernameTaken(_) => true,
            LedgerError::Domain(e) => e.is_rejection(),
            _ => false,
        }
    }

    /// Malformed request content
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, LedgerError::Domain(e) if !e.is_rejection())
    }

    /// Message safe to show to a client
    pub fn user_message(&self) -> String {
        match self {
            LedgerError::UserNotFound(_) => "User not found".to_string(),
            LedgerError::BusinessNotFound(_) => "Business not found".to_string(),
            LedgerError::ProductNotFound(_) => "Product not found".to_string(),
            LedgerError::AssetNotFound { .. } => "Asset not found".to_string(),
            LedgerError::InvalidCredentials => "Invalid credentials".to_string(),
            LedgerError::UsernameTaken(_) => "Username already exists".to_string(),
            LedgerError::Domain(e) => e.user_message(),
            LedgerError::Store(_) => "Internal server error".to_string(),
        }
    }
}

//! Types library for the classroom entrepreneur simulator
//!
//! Shared definitions for everything the ledger, the persistence layer and the
//! HTTP gateway exchange. Field names serialize in camelCase so the stored
//! JSON documents and the API payloads keep the shape the web client expects.
//!
//! # Modules
//! - `ids`: Identifiers (UserId, BusinessId, ProductId, TransactionId)
//! - `numeric`: Money helpers and simulation constants
//! - `timestamp`: ISO-8601 millisecond timestamps
//! - `account`: Users and roles
//! - `business`: Storefronts and their products
//! - `market`: Stocks, crypto and the market document
//! - `transaction`: Purchase and trade ledger records
//! - `position`: Holdings derived from trade history
//! - `errors`: Domain validation errors

pub mod ids;
pub mod numeric;
pub mod timestamp;
pub mod account;
pub mod business;
pub mod market;
pub mod transaction;
pub mod position;
pub mod errors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::account::*;
    pub use crate::business::*;
    pub use crate::market::*;
    pub use crate::transaction::*;
    pub use crate::position::*;
    pub use crate::errors::*;
}

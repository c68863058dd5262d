//! Ledger Service
//!
//! The business logic of the classroom simulator: product purchases between
//! students, market trades, derived holdings, storefront management, and
//! the teacher's statistics and reset. Everything runs against a `Store`;
//! every operation that touches several documents commits them together.
//!
//! # Modules
//! - `engine`: `Ledger`, the entry point used by the gateway
//! - `purchase` / `trade`: the two ways money moves
//! - `holdings`: positions folded from trade records
//! - `catalog`: accounts, businesses, products
//! - `admin`: statistics and reset
//! - `error`: `LedgerError`

pub mod admin;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod holdings;
pub mod purchase;
pub mod trade;

pub use admin::AdminStats;
pub use catalog::{Credentials, Registration};
pub use engine::{Ledger, LedgerPolicy, ResetOutcome, RESET_MESSAGE};
pub use error::LedgerError;
pub use purchase::{PurchaseReceipt, PurchaseRequest};
pub use trade::{TradeReceipt, TradeRequest};

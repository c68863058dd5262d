//! Ledger: orchestrator
//!
//! Owns the in-memory copy of every document and the store behind it.
//! Each mutating operation runs against a clone of the current state; the
//! touched documents are committed as one unit and the clone replaces the
//! current state only once the commit succeeded. A rejected request or a
//! failed commit therefore leaves both memory and disk untouched.

use chrono::Utc;
use market_data::{MarketSimulator, TickSummary};
use persistence::{BackupInfo, ChangeSet, Dataset, Document, Store};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use types::account::PublicUser;
use types::business::{Business, BusinessDraft, BusinessPatch, Product, ProductDraft, ProductPatch};
use types::ids::{BusinessId, ProductId, UserId};
use types::market::MarketSnapshot;
use types::numeric::INITIAL_STUDENT_BALANCE;
use types::position::{Holding, Portfolio};
use types::transaction::Transaction;

use crate::admin::{self, AdminStats};
use crate::catalog::{self, Credentials, Registration};
use crate::error::LedgerError;
use crate::holdings;
use crate::purchase::{self, PurchaseReceipt, PurchaseRequest};
use crate::trade::{self, TradeReceipt, TradeRequest};

pub const RESET_MESSAGE: &str = "Simulation reset successfully";

/// Rules that differ between classrooms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerPolicy {
    /// Let a sell go through without a matching position
    pub allow_naked_short_selling: bool,
    /// Balance for new students and after a reset
    pub initial_balance: Decimal,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            allow_naked_short_selling: true,
            initial_balance: INITIAL_STUDENT_BALANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResetOutcome {
    pub backup: BackupInfo,
    pub message: String,
}

pub struct Ledger {
    store: Box<dyn Store>,
    state: Dataset,
    policy: LedgerPolicy,
}

impl Ledger {
    /// Load every document from `store`
    pub fn open(store: Box<dyn Store>, policy: LedgerPolicy) -> Result<Self, LedgerError> {
        let state = store.load()?;
        info!(
            users = state.users.len(),
            businesses = state.businesses.len(),
            transactions = state.transactions.len(),
            "ledger loaded"
        );
        Ok(Self { store, state, policy })
    }

    pub fn state(&self) -> &Dataset {
        &self.state
    }

    /// Run `op` on a working copy, commit `documents` from it, then swap it in
    fn mutate<T>(
        &mut self,
        documents: &[Document],
        op: impl FnOnce(&mut Dataset) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let mut working = self.state.clone();
        let out = match op(&mut working) {
            Ok(out) => out,
            Err(e) => {
                if e.is_rejection() {
                    warn!(reason = %e, "request rejected");
                }
                return Err(e);
            }
        };
        self.store.commit(&ChangeSet::from_dataset(&working, documents))?;
        self.state = working;
        Ok(out)
    }

    // ── Reads ───────────────────────────────────────────────────────

    pub fn login(&self, credentials: &Credentials) -> Result<PublicUser, LedgerError> {
        let result = catalog::login(&self.state, credentials);
        if result.is_err() {
            warn!(username = %credentials.username, "login refused");
        }
        result
    }

    pub fn user(&self, id: &UserId) -> Result<PublicUser, LedgerError> {
        catalog::find_user(&self.state, id).map(|u| u.public())
    }

    pub fn users(&self) -> Vec<PublicUser> {
        self.state.users.iter().map(|u| u.public()).collect()
    }

    pub fn businesses(&self) -> &[Business] {
        &self.state.businesses
    }

    pub fn business(&self, id: &BusinessId) -> Result<&Business, LedgerError> {
        catalog::find_business(&self.state, id)
    }

    pub fn businesses_by_owner(&self, owner_id: &UserId) -> Vec<Business> {
        catalog::businesses_by_owner(&self.state, owner_id)
    }

    pub fn market(&self) -> &MarketSnapshot {
        &self.state.market
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.state.transactions
    }

    pub fn transactions_for(&self, user_id: &UserId) -> Vec<Transaction> {
        catalog::transactions_for(&self.state, user_id)
    }

    pub fn holdings_for(&self, user_id: &UserId) -> Result<Vec<Holding>, LedgerError> {
        catalog::find_user(&self.state, user_id)?;
        Ok(holdings::derive_holdings(&self.state.transactions, user_id))
    }

    pub fn portfolio_for(&self, user_id: &UserId) -> Result<Portfolio, LedgerError> {
        let user = catalog::find_user(&self.state, user_id)?;
        Ok(holdings::value_portfolio(
            user.balance,
            &self.state.transactions,
            user_id,
            &self.state.market,
        ))
    }

    pub fn compute_stats(&self) -> AdminStats {
        admin::compute_stats(&self.state)
    }

    // ── Accounts and catalog ────────────────────────────────────────

    pub fn register(&mut self, registration: Registration) -> Result<PublicUser, LedgerError> {
        let initial_balance = self.policy.initial_balance;
        let user = self.mutate(&[Document::Users], |s| {
            catalog::register(s, registration, initial_balance)
        })?;
        info!(user = %user.id, username = %user.username, "student registered");
        Ok(user)
    }

    pub fn create_business(&mut self, draft: BusinessDraft) -> Result<Business, LedgerError> {
        let business = self.mutate(&[Document::Businesses], |s| {
            catalog::create_business(s, draft, Utc::now())
        })?;
        info!(business = %business.id, owner = %business.owner_id, "business created");
        Ok(business)
    }

    pub fn update_business(&mut self, id: &BusinessId, patch: BusinessPatch) -> Result<Business, LedgerError> {
        self.mutate(&[Document::Businesses], |s| catalog::update_business(s, id, patch))
    }

    pub fn delete_business(&mut self, id: &BusinessId) -> Result<(), LedgerError> {
        self.mutate(&[Document::Businesses], |s| catalog::delete_business(s, id))?;
        info!(business = %id, "business deleted");
        Ok(())
    }

    pub fn add_product(&mut self, business_id: &BusinessId, draft: ProductDraft) -> Result<Product, LedgerError> {
        self.mutate(&[Document::Businesses], |s| catalog::add_product(s, business_id, draft))
    }

    pub fn update_product(
        &mut self,
        business_id: &BusinessId,
        product_id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Product, LedgerError> {
        self.mutate(&[Document::Businesses], |s| {
            catalog::update_product(s, business_id, product_id, patch)
        })
    }

    pub fn delete_product(&mut self, business_id: &BusinessId, product_id: &ProductId) -> Result<(), LedgerError> {
        self.mutate(&[Document::Businesses], |s| {
            catalog::delete_product(s, business_id, product_id)
        })
    }

    // ── Money movement ──────────────────────────────────────────────

    pub fn execute_purchase(&mut self, request: &PurchaseRequest) -> Result<PurchaseReceipt, LedgerError> {
        let receipt = self.mutate(
            &[Document::Users, Document::Businesses, Document::Transactions],
            |s| purchase::apply_purchase(s, request, Utc::now()),
        )?;
        info!(
            buyer = %request.buyer_id,
            business = %request.business_id,
            quantity = request.quantity,
            total = %receipt.transaction.total_amount(),
            "purchase executed"
        );
        Ok(receipt)
    }

    pub fn execute_trade(&mut self, request: &TradeRequest) -> Result<TradeReceipt, LedgerError> {
        let allow_naked = self.policy.allow_naked_short_selling;
        let receipt = self.mutate(&[Document::Users, Document::Transactions], |s| {
            trade::apply_trade(s, request, allow_naked, Utc::now())
        })?;
        info!(
            user = %request.user_id,
            symbol = %request.symbol,
            action = ?request.action,
            quantity = request.quantity,
            total = %receipt.transaction.total_amount(),
            "trade executed"
        );
        Ok(receipt)
    }

    // ── Market and admin ────────────────────────────────────────────

    /// Advance prices one step and persist the market document
    pub fn tick_market(&mut self, simulator: &mut MarketSimulator) -> Result<TickSummary, LedgerError> {
        self.mutate(&[Document::Market], |s| Ok(simulator.tick(&mut s.market)))
    }

    /// Back up, then clear businesses and transactions and restore student balances
    pub fn reset(&mut self) -> Result<ResetOutcome, LedgerError> {
        let backup = self.store.backup()?;
        let initial_balance = self.policy.initial_balance;
        self.mutate(&Document::MUTABLE, |s| {
            admin::reset_dataset(s, initial_balance);
            Ok(())
        })?;
        info!(backup = %backup.label, "simulation reset");
        Ok(ResetOutcome {
            backup,
            message: RESET_MESSAGE.to_string(),
        })
    }
}

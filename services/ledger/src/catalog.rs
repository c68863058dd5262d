//! Accounts, storefronts and products
//!
//! Lookups and edits that never move money. Counters on businesses and
//! products are not reachable from here; only purchases change them.

use chrono::{DateTime, Utc};
use persistence::Dataset;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::account::{PublicUser, User};
use types::business::{Business, BusinessDraft, BusinessPatch, Product, ProductDraft, ProductPatch};
use types::errors::DomainError;
use types::ids::{BusinessId, ProductId, UserId};
use types::transaction::Transaction;

use crate::error::LedgerError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Registration {
    pub name: String,
    pub username: String,
    pub password: String,
}

// ── Users ───────────────────────────────────────────────────────────

pub fn find_user<'a>(state: &'a Dataset, id: &UserId) -> Result<&'a User, LedgerError> {
    state
        .users
        .iter()
        .find(|u| &u.id == id)
        .ok_or_else(|| LedgerError::UserNotFound(id.clone()))
}

pub fn login(state: &Dataset, credentials: &Credentials) -> Result<PublicUser, LedgerError> {
    state
        .users
        .iter()
        .find(|u| u.username == credentials.username && u.password == credentials.password)
        .map(User::public)
        .ok_or(LedgerError::InvalidCredentials)
}

/// Add a student with `initial_balance`
pub fn register(
    state: &mut Dataset,
    registration: Registration,
    initial_balance: Decimal,
) -> Result<PublicUser, LedgerError> {
    if registration.username.trim().is_empty() {
        return Err(DomainError::MissingField("username").into());
    }
    if registration.password.is_empty() {
        return Err(DomainError::MissingField("password").into());
    }
    if state.users.iter().any(|u| u.username == registration.username) {
        return Err(LedgerError::UsernameTaken(registration.username));
    }
    let user = User::new_student(
        registration.name,
        registration.username,
        registration.password,
        initial_balance,
    );
    let public = user.public();
    state.users.push(user);
    Ok(public)
}

// ── Businesses ──────────────────────────────────────────────────────

pub fn find_business<'a>(state: &'a Dataset, id: &BusinessId) -> Result<&'a Business, LedgerError> {
    state
        .businesses
        .iter()
        .find(|b| &b.id == id)
        .ok_or_else(|| LedgerError::BusinessNotFound(id.clone()))
}

fn find_business_mut<'a>(state: &'a mut Dataset, id: &BusinessId) -> Result<&'a mut Business, LedgerError> {
    state
        .businesses
        .iter_mut()
        .find(|b| &b.id == id)
        .ok_or_else(|| LedgerError::BusinessNotFound(id.clone()))
}

pub fn businesses_by_owner(state: &Dataset, owner_id: &UserId) -> Vec<Business> {
    state
        .businesses
        .iter()
        .filter(|b| &b.owner_id == owner_id)
        .cloned()
        .collect()
}

/// Open a business for an existing user. The owner's name is used unless
/// the draft names one.
pub fn create_business(
    state: &mut Dataset,
    mut draft: BusinessDraft,
    now: DateTime<Utc>,
) -> Result<Business, LedgerError> {
    let owner_id = draft.owner_id.clone().ok_or(DomainError::MissingField("ownerId"))?;
    let owner = find_user(state, &owner_id)?;
    let owner_name = draft.owner_name.take().unwrap_or_else(|| owner.name.clone());
    let business = Business::from_draft(draft, owner_name, now)?;
    state.businesses.push(business.clone());
    Ok(business)
}

pub fn update_business(
    state: &mut Dataset,
    id: &BusinessId,
    patch: BusinessPatch,
) -> Result<Business, LedgerError> {
    if let Some(owner_id) = &patch.owner_id {
        find_user(state, owner_id)?;
    }
    let business = find_business_mut(state, id)?;
    business.apply_patch(patch);
    Ok(business.clone())
}

pub fn delete_business(state: &mut Dataset, id: &BusinessId) -> Result<(), LedgerError> {
    let before = state.businesses.len();
    state.businesses.retain(|b| &b.id != id);
    if state.businesses.len() == before {
        return Err(LedgerError::BusinessNotFound(id.clone()));
    }
    Ok(())
}

// ── Products ────────────────────────────────────────────────────────

pub fn add_product(
    state: &mut Dataset,
    business_id: &BusinessId,
    draft: ProductDraft,
) -> Result<Product, LedgerError> {
    let business = find_business_mut(state, business_id)?;
    let product = Product::from_draft(draft)?;
    business.products.push(product.clone());
    Ok(product)
}

pub fn update_product(
    state: &mut Dataset,
    business_id: &BusinessId,
    product_id: &ProductId,
    patch: ProductPatch,
) -> Result<Product, LedgerError> {
    let business = find_business_mut(state, business_id)?;
    let product = business
        .product_mut(product_id)
        .ok_or_else(|| LedgerError::ProductNotFound(product_id.clone()))?;
    product.apply_patch(patch)?;
    Ok(product.clone())
}

pub fn delete_product(
    state: &mut Dataset,
    business_id: &BusinessId,
    product_id: &ProductId,
) -> Result<(), LedgerError> {
    find_business_mut(state, business_id)?
        .remove_product(product_id)
        .map(|_| ())
        .ok_or_else(|| LedgerError::ProductNotFound(product_id.clone()))
}

// ── Transactions ────────────────────────────────────────────────────

/// Records where `user_id` was buyer, seller or trader, oldest first
pub fn transactions_for(state: &Dataset, user_id: &UserId) -> Vec<Transaction> {
    state
        .transactions
        .iter()
        .filter(|t| t.involves(user_id))
        .cloned()
        .collect()
}

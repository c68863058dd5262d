//! Product purchases between students
//!
//! All checks run before the first mutation, so a rejected purchase leaves
//! the working copy exactly as it was.

use chrono::{DateTime, Utc};
use persistence::Dataset;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use types::errors::{require_positive_quantity, DomainError};
use types::ids::{BusinessId, ProductId, UserId};
use types::numeric::line_total;
use types::transaction::{PurchaseDetails, Transaction};

use crate::error::LedgerError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub buyer_id: UserId,
    pub business_id: BusinessId,
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Outcome of a successful purchase
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReceipt {
    pub transaction: Transaction,
    pub new_balance: Decimal,
}

/// Apply a purchase to `state`
pub fn apply_purchase(
    state: &mut Dataset,
    request: &PurchaseRequest,
    now: DateTime<Utc>,
) -> Result<PurchaseReceipt, LedgerError> {
    let buyer_idx = state
        .users
        .iter()
        .position(|u| u.id == request.buyer_id)
        .ok_or_else(|| LedgerError::UserNotFound(request.buyer_id.clone()))?;
    let business_idx = state
        .businesses
        .iter()
        .position(|b| b.id == request.business_id)
        .ok_or_else(|| LedgerError::BusinessNotFound(request.business_id.clone()))?;
    let business = &state.businesses[business_idx];
    let product = business
        .product(&request.product_id)
        .ok_or_else(|| LedgerError::ProductNotFound(request.product_id.clone()))?;
    let quantity = require_positive_quantity(request.quantity)?;

    let buyer = &state.users[buyer_idx];
    let total = line_total(product.price, quantity);
    let Some(total) = total.filter(|t| buyer.can_afford(*t)) else {
        // A total past the Decimal range is beyond any balance
        return Err(DomainError::InsufficientFunds {
            required: total.unwrap_or(Decimal::MAX),
            available: buyer.balance,
        }
        .into());
    };

    let details = PurchaseDetails {
        buyer_id: buyer.id.clone(),
        buyer_name: buyer.name.clone(),
        seller_id: business.owner_id.clone(),
        seller_name: business.owner_name.clone(),
        business_id: business.id.clone(),
        business_name: business.name.clone(),
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        quantity,
        price_per_unit: product.price,
    };
    let owner_id = business.owner_id.clone();

    state.users[buyer_idx].debit(total)?;
    match state.users.iter_mut().find(|u| u.id == owner_id) {
        Some(owner) => owner.credit(total)?,
        None => debug!(owner = %owner_id, "business owner missing, sale not credited"),
    }
    state.businesses[business_idx].record_sale(&request.product_id, quantity, total)?;

    let transaction = Transaction::purchase(details, now)?;
    state.transactions.push(transaction.clone());

    Ok(PurchaseReceipt {
        transaction,
        new_balance: state.users[buyer_idx].balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use persistence::seed;
    use types::business::{Business, BusinessDraft, Product, ProductDraft};

    fn d(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    fn state_with_shop(price: &str) -> (Dataset, BusinessId, ProductId) {
        let mut business = Business::from_draft(
            BusinessDraft {
                owner_id: Some("student-2".into()),
                name: "Maria's Lemonade".into(),
                category: "Food".into(),
                ..Default::default()
            },
            "Maria Garcia".into(),
            Utc::now(),
        )
        .unwrap();
        let product = Product::from_draft(ProductDraft {
            name: "Lemonade".into(),
            price: d(price),
            ..Default::default()
        })
        .unwrap();
        let ids = (business.id.clone(), product.id.clone());
        business.products.push(product);
        let state = Dataset {
            users: seed::default_users(),
            businesses: vec![business],
            market: seed::default_market(),
            ..Default::default()
        };
        (state, ids.0, ids.1)
    }

    fn request(business_id: &BusinessId, product_id: &ProductId, quantity: u32) -> PurchaseRequest {
        PurchaseRequest {
            buyer_id: "student-1".into(),
            business_id: business_id.clone(),
            product_id: product_id.clone(),
            quantity,
        }
    }

    #[test]
    fn test_purchase_moves_money_and_counts_sale() {
        let (mut state, biz, prod) = state_with_shop("25.00");
        let receipt = apply_purchase(&mut state, &request(&biz, &prod, 2), Utc::now()).unwrap();

        assert_eq!(receipt.new_balance, d("9950.00"));
        assert_eq!(state.users[1].balance, d("9950.00"));
        assert_eq!(state.users[2].balance, d("10050.00"));
        assert_eq!(state.businesses[0].revenue, d("50.00"));
        assert_eq!(state.businesses[0].total_sales, 2);
        assert_eq!(state.businesses[0].products[0].sales, 2);
        assert_eq!(receipt.transaction.total_amount(), d("50.00"));
        assert_eq!(state.transactions.len(), 1);
    }

    #[test]
    fn test_insufficient_funds_changes_nothing() {
        let (mut state, biz, prod) = state_with_shop("6000");
        let before = state.clone();
        let err = apply_purchase(&mut state, &request(&biz, &prod, 2), Utc::now()).unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(state, before);
    }

    #[test]
    fn test_total_beyond_decimal_range_is_insufficient_funds() {
        let (mut state, biz, prod) = state_with_shop("100000000000000000000");
        let before = state.clone();
        let err = apply_purchase(&mut state, &request(&biz, &prod, 4_000_000_000), Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Domain(DomainError::InsufficientFunds { required, .. }) if required == Decimal::MAX
        ));
        assert!(err.is_rejection());
        assert_eq!(state, before);
    }

    #[test]
    fn test_unknown_product_is_not_found() {
        let (mut state, biz, _) = state_with_shop("1");
        let err = apply_purchase(&mut state, &request(&biz, &"nope".into(), 1), Utc::now()).unwrap_err();
        assert!(matches!(err, LedgerError::ProductNotFound(_)));
    }

    #[test]
    fn test_zero_quantity_is_invalid() {
        let (mut state, biz, prod) = state_with_shop("1");
        let err = apply_purchase(&mut state, &request(&biz, &prod, 0), Utc::now()).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_missing_owner_still_records_sale() {
        let (mut state, biz, prod) = state_with_shop("10");
        state.users.retain(|u| u.id != UserId::from("student-2"));
        let receipt = apply_purchase(&mut state, &request(&biz, &prod, 1), Utc::now()).unwrap();
        assert_eq!(receipt.new_balance, d("9990"));
        assert_eq!(state.businesses[0].revenue, d("10"));
    }

    #[test]
    fn test_buying_from_own_business_nets_zero() {
        let (mut state, biz, prod) = state_with_shop("10");
        state.businesses[0].owner_id = "student-1".into();
        let receipt = apply_purchase(&mut state, &request(&biz, &prod, 3), Utc::now()).unwrap();
        assert_eq!(receipt.new_balance, d("10000"));
        assert_eq!(state.businesses[0].revenue, d("30"));
    }
}

//! Classroom scenarios
//!
//! End-to-end runs of the ledger over an in-memory store: purchases and
//! trades move money exactly, rejections change nothing, reset restores
//! the starting position.

use ledger::{Ledger, LedgerError, LedgerPolicy, PurchaseRequest, TradeRequest};
use persistence::MemoryStore;
use rust_decimal::Decimal;
use types::business::{BusinessDraft, ProductDraft};
use types::ids::{BusinessId, ProductId, UserId};
use types::market::{AssetClass, MarketAsset};
use types::transaction::{TradeAction, Transaction};

fn d(s: &str) -> Decimal {
    Decimal::from_str_exact(s).unwrap()
}

fn open(store: &MemoryStore) -> Ledger {
    Ledger::open(Box::new(store.clone()), LedgerPolicy::default()).unwrap()
}

fn set_balance(store: &mut MemoryStore, user: &str, balance: &str) {
    let mut dataset = store.snapshot();
    for u in dataset.users.iter_mut().filter(|u| u.id == UserId::from(user)) {
        u.balance = d(balance);
    }
    *store = MemoryStore::new(dataset);
}

/// student2 opens a shop with one product at `price`
fn open_shop(ledger: &mut Ledger, price: &str) -> (BusinessId, ProductId) {
    let business = ledger
        .create_business(BusinessDraft {
            owner_id: Some("student-2".into()),
            name: "Maria's Bakery".into(),
            category: "Food".into(),
            ..Default::default()
        })
        .unwrap();
    let product = ledger
        .add_product(
            &business.id,
            ProductDraft {
                name: "Cookie box".into(),
                price: d(price),
                ..Default::default()
            },
        )
        .unwrap();
    (business.id, product.id)
}

fn with_test_stock(store: MemoryStore) -> MemoryStore {
    let mut dataset = store.snapshot();
    dataset
        .market
        .stocks
        .push(MarketAsset::new("TEST", "Test Corp.", d("100.00"), Decimal::ZERO));
    MemoryStore::new(dataset)
}

fn buy_test_stock(quantity: u32) -> TradeRequest {
    TradeRequest {
        user_id: "student-1".into(),
        asset_type: AssetClass::Stock,
        symbol: "TEST".into(),
        action: TradeAction::Buy,
        quantity,
    }
}

#[test]
fn test_purchase_between_students() {
    let store = MemoryStore::seeded();
    let mut ledger = open(&store);
    let (business_id, product_id) = open_shop(&mut ledger, "25.00");

    let receipt = ledger
        .execute_purchase(&PurchaseRequest {
            buyer_id: "student-1".into(),
            business_id: business_id.clone(),
            product_id,
            quantity: 2,
        })
        .unwrap();

    assert_eq!(receipt.new_balance, d("9950.00"));
    assert_eq!(ledger.user(&"student-2".into()).unwrap().balance, d("10050.00"));
    let business = ledger.business(&business_id).unwrap();
    assert_eq!(business.revenue, d("50.00"));
    assert_eq!(business.total_sales, 2);

    let purchases: Vec<_> = ledger.transactions().iter().filter(|t| t.is_purchase()).collect();
    assert_eq!(purchases.len(), 1);
    assert_eq!(purchases[0].total_amount(), d("50.00"));

    // Persisted together
    let persisted = store.snapshot();
    assert_eq!(persisted.users[1].balance, d("9950.00"));
    assert_eq!(persisted.businesses[0].revenue, d("50.00"));
    assert_eq!(persisted.transactions.len(), 1);
}

#[test]
fn test_buy_within_balance() {
    let mut store = with_test_stock(MemoryStore::seeded());
    set_balance(&mut store, "student-1", "500");
    let mut ledger = open(&store);

    let receipt = ledger.execute_trade(&buy_test_stock(3)).unwrap();
    assert_eq!(receipt.new_balance, d("200.00"));
    match &receipt.transaction {
        Transaction::Buy(t) => assert_eq!(t.total_amount, d("300.00")),
        other => panic!("expected buy record, got {:?}", other),
    }
    assert_eq!(ledger.transactions().len(), 1);
}

#[test]
fn test_buy_over_balance_is_rejected() {
    let mut store = with_test_stock(MemoryStore::seeded());
    set_balance(&mut store, "student-1", "200");
    let mut ledger = open(&store);

    let err = ledger.execute_trade(&buy_test_stock(3)).unwrap_err();
    assert!(err.is_rejection());
    assert_eq!(err.user_message(), "Insufficient funds");
    assert_eq!(ledger.user(&"student-1".into()).unwrap().balance, d("200"));
    assert!(ledger.transactions().is_empty());
    assert!(store.snapshot().transactions.is_empty());
}

#[test]
fn test_reset_restores_balances_and_backs_up() {
    let mut store = MemoryStore::seeded();
    set_balance(&mut store, "student-1", "5000");
    set_balance(&mut store, "student-2", "15000");
    let mut ledger = open(&store);
    let (business_id, product_id) = open_shop(&mut ledger, "10");
    ledger
        .execute_purchase(&PurchaseRequest {
            buyer_id: "student-1".into(),
            business_id,
            product_id,
            quantity: 1,
        })
        .unwrap();

    let outcome = ledger.reset().unwrap();
    assert_eq!(outcome.message, "Simulation reset successfully");

    for id in ["student-1", "student-2"] {
        assert_eq!(ledger.user(&id.into()).unwrap().balance, d("10000"));
    }
    assert_eq!(ledger.user(&"teacher-1".into()).unwrap().balance, Decimal::ZERO);
    assert!(ledger.businesses().is_empty());
    assert!(ledger.transactions().is_empty());

    let backups = store.backups();
    assert_eq!(backups.len(), 1);
    let (info, captured) = &backups[0];
    assert_eq!(info, &outcome.backup);
    assert_eq!(captured.users[1].balance, d("4990"));
    assert_eq!(captured.users[2].balance, d("15010"));
    assert_eq!(captured.businesses.len(), 1);
    assert_eq!(captured.transactions.len(), 1);
}

#[test]
fn test_failed_commit_changes_nothing() {
    let store = MemoryStore::seeded();
    let mut ledger = open(&store);
    let (business_id, product_id) = open_shop(&mut ledger, "25.00");
    let before = store.snapshot();

    store.fail_commits(true);
    let err = ledger
        .execute_purchase(&PurchaseRequest {
            buyer_id: "student-1".into(),
            business_id: business_id.clone(),
            product_id,
            quantity: 2,
        })
        .unwrap_err();
    assert!(matches!(err, LedgerError::Store(_)));

    assert_eq!(store.snapshot(), before);
    assert_eq!(ledger.state(), &before);
}

#[test]
fn test_unrelated_operations_do_not_touch_business() {
    let store = with_test_stock(MemoryStore::seeded());
    let mut ledger = open(&store);
    let (business_id, _) = open_shop(&mut ledger, "3");
    let first = serde_json::to_string(ledger.business(&business_id).unwrap()).unwrap();

    ledger.execute_trade(&buy_test_stock(1)).unwrap();
    ledger.compute_stats();

    let second = serde_json::to_string(ledger.business(&business_id).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_user_history_includes_trades_and_sales() {
    let store = with_test_stock(MemoryStore::seeded());
    let mut ledger = open(&store);
    let (business_id, product_id) = open_shop(&mut ledger, "5");
    ledger.execute_trade(&buy_test_stock(1)).unwrap();
    ledger
        .execute_purchase(&PurchaseRequest {
            buyer_id: "student-1".into(),
            business_id,
            product_id,
            quantity: 1,
        })
        .unwrap();

    assert_eq!(ledger.transactions_for(&"student-1".into()).len(), 2);
    // Seller sees the sale, not the buyer's trade
    assert_eq!(ledger.transactions_for(&"student-2".into()).len(), 1);

    let holdings = ledger.holdings_for(&"student-1".into()).unwrap();
    assert_eq!(holdings.len(), 1);
    assert_eq!(holdings[0].symbol, "TEST");
}

#[test]
fn test_strict_policy_blocks_naked_sell() {
    let store = with_test_stock(MemoryStore::seeded());
    let policy = LedgerPolicy {
        allow_naked_short_selling: false,
        ..Default::default()
    };
    let mut ledger = Ledger::open(Box::new(store.clone()), policy).unwrap();

    let mut sell = buy_test_stock(1);
    sell.action = TradeAction::Sell;
    let err = ledger.execute_trade(&sell).unwrap_err();
    assert!(err.is_rejection());
    assert!(store.snapshot().transactions.is_empty());
}

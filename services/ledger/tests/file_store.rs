//! Ledger over the JSON file store
//!
//! Verifies that committed state survives a restart and that reset leaves
//! a backup directory holding the pre-reset documents.

use ledger::{Ledger, LedgerPolicy, PurchaseRequest, Registration};
use persistence::backup::list_backups;
use persistence::JsonFileStore;
use rust_decimal::Decimal;
use std::fs;
use tempfile::TempDir;
use types::account::User;
use types::business::{BusinessDraft, ProductDraft};

fn open(dir: &TempDir) -> Ledger {
    let store = JsonFileStore::open(dir.path()).unwrap();
    Ledger::open(Box::new(store), LedgerPolicy::default()).unwrap()
}

#[test]
fn test_state_survives_restart() {
    let dir = TempDir::new().unwrap();
    let user_id = {
        let mut ledger = open(&dir);
        ledger
            .register(Registration {
                name: "Sam Lee".into(),
                username: "sam".into(),
                password: "pw".into(),
            })
            .unwrap()
            .id
    };

    let ledger = open(&dir);
    let user = ledger.user(&user_id).unwrap();
    assert_eq!(user.username, "sam");
    assert_eq!(user.balance, Decimal::from(10_000));
}

#[test]
fn test_reset_writes_backup_directory() {
    let dir = TempDir::new().unwrap();
    let mut ledger = open(&dir);
    let business = ledger
        .create_business(BusinessDraft {
            owner_id: Some("student-2".into()),
            name: "Garden Club".into(),
            category: "Services".into(),
            ..Default::default()
        })
        .unwrap();
    let product = ledger
        .add_product(
            &business.id,
            ProductDraft {
                name: "Weeding".into(),
                price: Decimal::from(40),
                ..Default::default()
            },
        )
        .unwrap();
    ledger
        .execute_purchase(&PurchaseRequest {
            buyer_id: "student-3".into(),
            business_id: business.id.clone(),
            product_id: product.id,
            quantity: 1,
        })
        .unwrap();

    let outcome = ledger.reset().unwrap();
    let backup_dir = outcome.backup.location.clone().unwrap();
    assert_eq!(list_backups(dir.path()).unwrap(), vec![backup_dir.clone()]);

    let saved: Vec<User> =
        serde_json::from_str(&fs::read_to_string(backup_dir.join("users.json")).unwrap()).unwrap();
    let saved_student3 = saved.iter().find(|u| u.username == "student3").unwrap();
    assert_eq!(saved_student3.balance, Decimal::from(9_960));
    let saved_businesses = fs::read_to_string(backup_dir.join("businesses.json")).unwrap();
    assert!(saved_businesses.contains("Garden Club"));

    // Live documents are reset on disk
    let live = fs::read_to_string(dir.path().join("businesses.json")).unwrap();
    assert_eq!(live, "[]");
    let reopened = open(&dir);
    assert!(reopened.transactions().is_empty());
    assert_eq!(
        reopened.user(&"student-3".into()).unwrap().balance,
        Decimal::from(10_000)
    );
}

#[test]
fn test_failed_purchase_leaves_disk_and_memory_in_step() {
    let dir = TempDir::new().unwrap();
    let mut ledger = open(&dir);
    let business = ledger
        .create_business(BusinessDraft {
            owner_id: Some("student-2".into()),
            name: "Lemonade Stand".into(),
            category: "Food".into(),
            ..Default::default()
        })
        .unwrap();
    let product = ledger
        .add_product(
            &business.id,
            ProductDraft {
                name: "Lemonade".into(),
                price: Decimal::from(100),
                ..Default::default()
            },
        )
        .unwrap();

    let blocker = dir.path().join("businesses.json.tmp");
    fs::create_dir(&blocker).unwrap();
    let result = ledger.execute_purchase(&PurchaseRequest {
        buyer_id: "student-1".into(),
        business_id: business.id.clone(),
        product_id: product.id.clone(),
        quantity: 1,
    });
    assert!(result.is_err());
    assert!(!dir.path().join("commit.journal.json").exists());

    let on_disk = |dir: &TempDir| -> Vec<User> {
        serde_json::from_str(&fs::read_to_string(dir.path().join("users.json")).unwrap()).unwrap()
    };
    let student1 = |users: &[User]| users.iter().find(|u| u.username == "student1").unwrap().balance;
    assert_eq!(student1(&on_disk(&dir)), Decimal::from(10_000));
    assert_eq!(
        ledger.user(&"student-1".into()).unwrap().balance,
        Decimal::from(10_000)
    );

    // The next commit does not resurrect the failed purchase
    fs::remove_dir(&blocker).unwrap();
    ledger
        .add_product(
            &business.id,
            ProductDraft {
                name: "Iced tea".into(),
                price: Decimal::from(3),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(student1(&on_disk(&dir)), Decimal::from(10_000));
    let reopened = open(&dir);
    assert!(reopened.transactions().is_empty());
    assert_eq!(reopened.business(&business.id).unwrap().products.len(), 2);
}

//! First-boot data: the classroom's default accounts and the starting market

use rust_decimal::Decimal;
use types::account::{Role, User};
use types::ids::UserId;
use types::market::{MarketAsset, MarketSnapshot};
use types::numeric::INITIAL_STUDENT_BALANCE;

fn account(id: &str, username: &str, password: &str, role: Role, name: &str, balance: Decimal) -> User {
    User {
        id: UserId::from(id),
        username: username.to_string(),
        password: password.to_string(),
        role,
        name: name.to_string(),
        balance,
    }
}

/// The teacher plus three students, teacher first
pub fn default_users() -> Vec<User> {
    vec![
        account("teacher-1", "teacher", "teacher123", Role::Teacher, "Mr. Smith", Decimal::ZERO),
        account("student-1", "student1", "student1", Role::Student, "Alex Johnson", INITIAL_STUDENT_BALANCE),
        account("student-2", "student2", "student2", Role::Student, "Maria Garcia", INITIAL_STUDENT_BALANCE),
        account("student-3", "student3", "student3", Role::Student, "James Chen", INITIAL_STUDENT_BALANCE),
    ]
}

/// Append any default account whose username is missing. Returns how many were added.
pub fn merge_default_users(users: &mut Vec<User>) -> usize {
    let missing: Vec<User> = default_users()
        .into_iter()
        .filter(|d| !users.iter().any(|u| u.username == d.username))
        .collect();
    let added = missing.len();
    users.extend(missing);
    added
}

fn asset(symbol: &str, name: &str, price: i64, price_scale: u32, change: i64) -> MarketAsset {
    MarketAsset::new(symbol, name, Decimal::new(price, price_scale), Decimal::new(change, 1))
}

/// Eight stocks and seven coins at their opening prices
pub fn default_market() -> MarketSnapshot {
    MarketSnapshot {
        stocks: vec![
            asset("AAPL", "Apple Inc.", 17850, 2, 25),
            asset("GOOGL", "Alphabet Inc.", 14230, 2, -12),
            asset("MSFT", "Microsoft Corp.", 41280, 2, 37),
            asset("AMZN", "Amazon.com Inc.", 18590, 2, 18),
            asset("TSLA", "Tesla Inc.", 24820, 2, -45),
            asset("META", "Meta Platforms", 51260, 2, 29),
            asset("NVDA", "NVIDIA Corp.", 49530, 2, 52),
            asset("JPM", "JPMorgan Chase", 19840, 2, 11),
        ],
        crypto: vec![
            asset("BTC", "Bitcoin", 6850000, 2, 34),
            asset("ETH", "Ethereum", 380000, 2, 21),
            asset("BNB", "Binance Coin", 62550, 2, -8),
            asset("SOL", "Solana", 14520, 2, 67),
            asset("ADA", "Cardano", 65, 2, 15),
            asset("DOT", "Polkadot", 785, 2, -23),
            asset("MATIC", "Polygon", 92, 2, 42),
        ],
    }
}

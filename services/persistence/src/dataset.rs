//! In-memory documents and change sets

use serde::{Deserialize, Serialize};
use types::account::User;
use types::business::Business;
use types::market::MarketSnapshot;
use types::transaction::Transaction;

/// One of the four persisted documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Document {
    Users,
    Businesses,
    Transactions,
    Market,
}

impl Document {
    pub const ALL: [Document; 4] = [
        Document::Users,
        Document::Businesses,
        Document::Transactions,
        Document::Market,
    ];

    /// Documents the simulation mutates and a reset backs up
    pub const MUTABLE: [Document; 3] = [
        Document::Users,
        Document::Businesses,
        Document::Transactions,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Document::Users => "users.json",
            Document::Businesses => "businesses.json",
            Document::Transactions => "transactions.json",
            Document::Market => "market.json",
        }
    }
}

/// Everything the simulation knows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub users: Vec<User>,
    pub businesses: Vec<Business>,
    pub transactions: Vec<Transaction>,
    pub market: MarketSnapshot,
}

/// The documents one logical operation replaces, committed together
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeSet<'a> {
    users: Option<&'a [User]>,
    businesses: Option<&'a [Business]>,
    transactions: Option<&'a [Transaction]>,
    market: Option<&'a MarketSnapshot>,
}

impl<'a> ChangeSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `documents` out of `dataset`
    pub fn from_dataset(dataset: &'a Dataset, documents: &[Document]) -> Self {
        documents.iter().fold(Self::new(), |changes, doc| match doc {
            Document::Users => changes.users(&dataset.users),
            Document::Businesses => changes.businesses(&dataset.businesses),
            Document::Transactions => changes.transactions(&dataset.transactions),
            Document::Market => changes.market(&dataset.market),
        })
    }

    pub fn users(mut self, users: &'a [User]) -> Self {
        self.users = Some(users);
        self
    }

    pub fn businesses(mut self, businesses: &'a [Business]) -> Self {
        self.businesses = Some(businesses);
        self
    }

    pub fn transactions(mut self, transactions: &'a [Transaction]) -> Self {
        self.transactions = Some(transactions);
        self
    }

    pub fn market(mut self, market: &'a MarketSnapshot) -> Self {
        self.market = Some(market);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.documents().is_empty()
    }

    /// Documents touched, in a fixed order
    pub fn documents(&self) -> Vec<Document> {
        let mut docs = Vec::with_capacity(4);
        if self.users.is_some() {
            docs.push(Document::Users);
        }
        if self.businesses.is_some() {
            docs.push(Document::Businesses);
        }
        if self.transactions.is_some() {
            docs.push(Document::Transactions);
        }
        if self.market.is_some() {
            docs.push(Document::Market);
        }
        docs
    }

    /// Render every changed document as pretty JSON (2-space indent)
    pub fn render(&self) -> Result<Vec<(Document, String)>, serde_json::Error> {
        let mut rendered = Vec::with_capacity(4);
        if let Some(users) = self.users {
            rendered.push((Document::Users, serde_json::to_string_pretty(users)?));
        }
        if let Some(businesses) = self.businesses {
            rendered.push((Document::Businesses, serde_json::to_string_pretty(businesses)?));
        }
        if let Some(transactions) = self.transactions {
            rendered.push((Document::Transactions, serde_json::to_string_pretty(transactions)?));
        }
        if let Some(market) = self.market {
            rendered.push((Document::Market, serde_json::to_string_pretty(market)?));
        }
        Ok(rendered)
    }

    /// Copy the changed documents into `dataset`
    pub fn apply_to(&self, dataset: &mut Dataset) {
        if let Some(users) = self.users {
            dataset.users = users.to_vec();
        }
        if let Some(businesses) = self.businesses {
            dataset.businesses = businesses.to_vec();
        }
        if let Some(transactions) = self.transactions {
            dataset.transactions = transactions.to_vec();
        }
        if let Some(market) = self.market {
            dataset.market = market.clone();
        }
    }
}

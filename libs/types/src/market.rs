//! Simulated stocks and crypto
//!
//! The market document holds the current price and last percentage change of
//! every tradeable asset. No price history is kept.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Asset class a symbol belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Stock,
    Crypto,
}

impl AssetClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Stock => "stock",
            AssetClass::Crypto => "crypto",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tradeable asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAsset {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
    /// Percentage change applied by the last tick
    #[serde(default)]
    pub change: Decimal,
}

impl MarketAsset {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, price: Decimal, change: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            price,
            change,
        }
    }
}

/// The whole market document: `{ "stocks": [...], "crypto": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(default)]
    pub stocks: Vec<MarketAsset>,
    #[serde(default)]
    pub crypto: Vec<MarketAsset>,
}

impl MarketSnapshot {
    pub fn assets(&self, class: AssetClass) -> &[MarketAsset] {
        match class {
            AssetClass::Stock => &self.stocks,
            AssetClass::Crypto => &self.crypto,
        }
    }

    pub fn assets_mut(&mut self, class: AssetClass) -> &mut Vec<MarketAsset> {
        match class {
            AssetClass::Stock => &mut self.stocks,
            AssetClass::Crypto => &mut self.crypto,
        }
    }

    /// Look up a symbol within one asset class
    pub fn find(&self, class: AssetClass, symbol: &str) -> Option<&MarketAsset> {
        self.assets(class).iter().find(|a| a.symbol == symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> MarketSnapshot {
        MarketSnapshot {
            stocks: vec![MarketAsset::new("AAPL", "Apple Inc.", Decimal::from(178), Decimal::ZERO)],
            crypto: vec![MarketAsset::new("BTC", "Bitcoin", Decimal::from(68_500), Decimal::ZERO)],
        }
    }

    #[test]
    fn test_find_is_scoped_to_class() {
        let market = snapshot();
        assert!(market.find(AssetClass::Stock, "AAPL").is_some());
        assert!(market.find(AssetClass::Crypto, "AAPL").is_none());
        assert!(market.find(AssetClass::Crypto, "BTC").is_some());
    }

    #[test]
    fn test_asset_class_wire_names() {
        assert_eq!(serde_json::to_string(&AssetClass::Stock).unwrap(), "\"stock\"");
        let parsed: AssetClass = serde_json::from_str("\"crypto\"").unwrap();
        assert_eq!(parsed, AssetClass::Crypto);
    }

    #[test]
    fn test_reads_original_document() {
        let raw = r#"{
            "stocks": [{ "symbol": "TSLA", "name": "Tesla Inc.", "price": 248.20, "change": -4.5 }],
            "crypto": [{ "symbol": "ADA", "name": "Cardano", "price": 0.65, "change": 1.5 }]
        }"#;
        let market: MarketSnapshot = serde_json::from_str(raw).unwrap();
        let ada = market.find(AssetClass::Crypto, "ADA").unwrap();
        assert_eq!(ada.price, Decimal::from_str_exact("0.65").unwrap());
        assert_eq!(market.stocks[0].change, Decimal::from_str_exact("-4.5").unwrap());
    }
}

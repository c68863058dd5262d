//! Gateway configuration, read from the environment after `.env` is loaded

use ledger::LedgerPolicy;
use market_data::VolatilityConfig;
use rust_decimal::Decimal;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    /// `None` turns the background ticker off
    pub market_tick: Option<Duration>,
    pub volatility: VolatilityConfig,
    pub policy: LedgerPolicy,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            data_dir: PathBuf::from("data"),
            market_tick: Some(Duration::from_secs(10)),
            volatility: VolatilityConfig::default(),
            policy: LedgerPolicy::default(),
        }
    }
}

fn invalid(key: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    value.trim().parse().map_err(|e: T::Err| invalid(key, value, e))
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}

impl GatewayConfig {
    /// Load configuration from process environment variables
    ///
    /// Reads PORT, DATA_DIR, MARKET_TICK_SECS, STOCK_VOLATILITY_PCT,
    /// CRYPTO_VOLATILITY_PCT, ALLOW_NAKED_SHORT_SELLING and INITIAL_BALANCE.
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = lookup("PORT") {
            config.port = parse("PORT", &v)?;
        }
        if let Some(v) = lookup("DATA_DIR") {
            if v.trim().is_empty() {
                return Err(invalid("DATA_DIR", &v, "must not be empty"));
            }
            config.data_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("MARKET_TICK_SECS") {
            let secs: u64 = parse("MARKET_TICK_SECS", &v)?;
            config.market_tick = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(v) = lookup("STOCK_VOLATILITY_PCT") {
            config.volatility.stock_pct = parse::<Decimal>("STOCK_VOLATILITY_PCT", &v)?;
        }
        if let Some(v) = lookup("CRYPTO_VOLATILITY_PCT") {
            config.volatility.crypto_pct = parse::<Decimal>("CRYPTO_VOLATILITY_PCT", &v)?;
        }
        if let Err(e) = config.volatility.validate() {
            return Err(ConfigError::Invalid {
                key: "STOCK_VOLATILITY_PCT/CRYPTO_VOLATILITY_PCT",
                value: format!("{}/{}", config.volatility.stock_pct, config.volatility.crypto_pct),
                reason: e.to_string(),
            });
        }
        if let Some(v) = lookup("ALLOW_NAKED_SHORT_SELLING") {
            config.policy.allow_naked_short_selling = parse_bool("ALLOW_NAKED_SHORT_SELLING", &v)?;
        }
        if let Some(v) = lookup("INITIAL_BALANCE") {
            let balance: Decimal = parse("INITIAL_BALANCE", &v)?;
            if balance.is_sign_negative() {
                return Err(invalid("INITIAL_BALANCE", &v, "must not be negative"));
            }
            config.policy.initial_balance = balance;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<GatewayConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config, GatewayConfig::default());
        assert_eq!(config.port, 3000);
        assert_eq!(config.market_tick, Some(Duration::from_secs(10)));
        assert!(config.policy.allow_naked_short_selling);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "8080"),
            ("DATA_DIR", "/tmp/classroom"),
            ("MARKET_TICK_SECS", "0"),
            ("CRYPTO_VOLATILITY_PCT", "5"),
            ("ALLOW_NAKED_SHORT_SELLING", "false"),
            ("INITIAL_BALANCE", "2500.50"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/classroom"));
        assert_eq!(config.market_tick, None);
        assert_eq!(config.volatility.crypto_pct, Decimal::from(5));
        assert!(!config.policy.allow_naked_short_selling);
        assert_eq!(config.policy.initial_balance, Decimal::new(250050, 2));
    }

    #[test]
    fn test_malformed_values_are_errors() {
        assert!(matches!(
            load(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid { key: "PORT", .. })
        ));
        assert!(load(&[("ALLOW_NAKED_SHORT_SELLING", "maybe")]).is_err());
        assert!(load(&[("STOCK_VOLATILITY_PCT", "150")]).is_err());
        assert!(load(&[("INITIAL_BALANCE", "-1")]).is_err());
    }
}

//! Random-walk price simulator

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use types::market::{AssetClass, MarketAsset, MarketSnapshot};
use types::numeric::{CHANGE_DP, PRICE_DP};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulatorError {
    #[error("Volatility for {class} must be within [0, 100), got {value}")]
    InvalidVolatility { class: AssetClass, value: Decimal },
}

/// Per-class bound, in percent, on a single tick's move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityConfig {
    pub stock_pct: Decimal,
    pub crypto_pct: Decimal,
}

impl Default for VolatilityConfig {
    fn default() -> Self {
        Self {
            stock_pct: Decimal::ONE,
            crypto_pct: Decimal::TWO,
        }
    }
}

impl VolatilityConfig {
    pub fn bound(&self, class: AssetClass) -> Decimal {
        match class {
            AssetClass::Stock => self.stock_pct,
            AssetClass::Crypto => self.crypto_pct,
        }
    }

    pub fn validate(&self) -> Result<(), SimulatorError> {
        for class in [AssetClass::Stock, AssetClass::Crypto] {
            let value = self.bound(class);
            if value < Decimal::ZERO || value >= Decimal::ONE_HUNDRED {
                return Err(SimulatorError::InvalidVolatility { class, value });
            }
        }
        Ok(())
    }
}

/// How many assets a tick moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickSummary {
    pub stocks: usize,
    pub crypto: usize,
}

pub struct MarketSimulator {
    config: VolatilityConfig,
    rng: ChaCha8Rng,
    ticks: u64,
}

impl MarketSimulator {
    /// Simulator seeded from OS entropy
    pub fn new(config: VolatilityConfig) -> Result<Self, SimulatorError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: ChaCha8Rng::from_entropy(),
            ticks: 0,
        })
    }

    /// Simulator with a fixed seed, for reproducible runs
    pub fn with_seed(config: VolatilityConfig, seed: u64) -> Result<Self, SimulatorError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            ticks: 0,
        })
    }

    /// Ticks applied so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance every asset in `market` by one step
    pub fn tick(&mut self, market: &mut MarketSnapshot) -> TickSummary {
        let summary = TickSummary {
            stocks: self.step_class(market.assets_mut(AssetClass::Stock), AssetClass::Stock),
            crypto: self.step_class(market.assets_mut(AssetClass::Crypto), AssetClass::Crypto),
        };
        self.ticks += 1;
        debug!(tick = self.ticks, stocks = summary.stocks, crypto = summary.crypto, "market tick");
        summary
    }

    fn step_class(&mut self, assets: &mut [MarketAsset], class: AssetClass) -> usize {
        let bound = self.config.bound(class);
        for asset in assets.iter_mut() {
            let pct = self.draw_percent(bound);
            step_asset(asset, pct);
        }
        assets.len()
    }

    /// Uniform draw in [-bound, +bound], kept to `CHANGE_DP` places
    fn draw_percent(&mut self, bound: Decimal) -> Decimal {
        let b = bound.to_f64().unwrap_or(0.0);
        if b <= 0.0 {
            return Decimal::ZERO;
        }
        let pct: f64 = self.rng.gen_range(-b..=b);
        Decimal::from_f64(pct)
            .unwrap_or(Decimal::ZERO)
            .round_dp(CHANGE_DP)
            .clamp(-bound, bound)
    }
}

/// `price *= 1 + pct/100`, `change = pct`.
///
/// Rounding goes toward the old price so the stored move never exceeds `pct`.
/// A price that would leave the `Decimal` range stays where it is.
fn step_asset(asset: &mut MarketAsset, pct: Decimal) {
    let factor = Decimal::ONE + pct / Decimal::ONE_HUNDRED;
    let Some(exact) = asset.price.checked_mul(factor) else {
        warn!(symbol = %asset.symbol, "price out of range, left unchanged");
        asset.change = Decimal::ZERO;
        return;
    };
    let strategy = if pct.is_sign_negative() {
        RoundingStrategy::AwayFromZero
    } else {
        RoundingStrategy::ToZero
    };
    asset.price = exact.round_dp_with_strategy(PRICE_DP, strategy);
    asset.change = pct;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    fn market() -> MarketSnapshot {
        MarketSnapshot {
            stocks: vec![
                MarketAsset::new("AAPL", "Apple Inc.", d("178.50"), d("2.5")),
                MarketAsset::new("TSLA", "Tesla Inc.", d("248.20"), d("-4.5")),
            ],
            crypto: vec![
                MarketAsset::new("BTC", "Bitcoin", d("68500.00"), d("3.4")),
                MarketAsset::new("ADA", "Cardano", d("0.65"), d("1.5")),
            ],
        }
    }

    fn within_bound(old: Decimal, new: Decimal, bound_pct: Decimal) -> bool {
        let lo = old * (Decimal::ONE - bound_pct / Decimal::ONE_HUNDRED);
        let hi = old * (Decimal::ONE + bound_pct / Decimal::ONE_HUNDRED);
        new >= lo && new <= hi
    }

    #[test]
    fn test_step_applies_percentage() {
        let mut asset = MarketAsset::new("AAPL", "Apple Inc.", d("200"), Decimal::ZERO);
        step_asset(&mut asset, d("-0.5"));
        assert_eq!(asset.price, d("199"));
        assert_eq!(asset.change, d("-0.5"));
    }

    #[test]
    fn test_rounding_stays_inside_the_move() {
        // 0.33333333 × 1.02 = 0.3399999966: nearest rounding would give 0.34
        let mut up = MarketAsset::new("ADA", "Cardano", d("0.33333333"), Decimal::ZERO);
        step_asset(&mut up, Decimal::TWO);
        assert_eq!(up.price, d("0.33999999"));

        // 0.33333333 × 0.98 = 0.3266666634: nearest rounding would give 0.32666666
        let mut down = MarketAsset::new("ADA", "Cardano", d("0.33333333"), Decimal::ZERO);
        step_asset(&mut down, -Decimal::TWO);
        assert_eq!(down.price, d("0.32666667"));
        assert!(within_bound(d("0.33333333"), down.price, Decimal::TWO));
    }

    #[test]
    fn test_price_out_of_range_is_left_alone() {
        let mut asset = MarketAsset::new("HUGE", "Huge Corp.", Decimal::MAX, d("1.5"));
        step_asset(&mut asset, Decimal::ONE);
        assert_eq!(asset.price, Decimal::MAX);
        assert_eq!(asset.change, Decimal::ZERO);
    }

    #[test]
    fn test_same_seed_same_walk() {
        let mut a = market();
        let mut b = market();
        let mut sim_a = MarketSimulator::with_seed(VolatilityConfig::default(), 7).unwrap();
        let mut sim_b = MarketSimulator::with_seed(VolatilityConfig::default(), 7).unwrap();
        for _ in 0..5 {
            sim_a.tick(&mut a);
            sim_b.tick(&mut b);
        }
        assert_eq!(a, b);
        assert_eq!(sim_a.ticks(), 5);
    }

    #[test]
    fn test_tick_moves_every_asset_and_records_change() {
        let mut m = market();
        let mut sim = MarketSimulator::with_seed(VolatilityConfig::default(), 1).unwrap();
        let summary = sim.tick(&mut m);
        assert_eq!(summary, TickSummary { stocks: 2, crypto: 2 });
        for asset in m.stocks.iter() {
            assert!(asset.change.abs() <= Decimal::ONE);
            assert!(asset.change.scale() <= CHANGE_DP);
        }
        for asset in m.crypto.iter() {
            assert!(asset.change.abs() <= Decimal::TWO);
            assert!(asset.price.scale() <= PRICE_DP);
        }
    }

    #[test]
    fn test_zero_volatility_freezes_prices() {
        let config = VolatilityConfig {
            stock_pct: Decimal::ZERO,
            crypto_pct: Decimal::ZERO,
        };
        let mut m = market();
        let before = m.clone();
        MarketSimulator::with_seed(config, 3).unwrap().tick(&mut m);
        for (old, new) in before.stocks.iter().zip(m.stocks.iter()) {
            assert_eq!(old.price, new.price);
            assert_eq!(new.change, Decimal::ZERO);
        }
    }

    #[test]
    fn test_rejects_out_of_range_volatility() {
        let config = VolatilityConfig {
            stock_pct: Decimal::ONE_HUNDRED,
            crypto_pct: Decimal::TWO,
        };
        assert!(matches!(
            MarketSimulator::with_seed(config, 0),
            Err(SimulatorError::InvalidVolatility { class: AssetClass::Stock, .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_tick_stays_within_class_bound(seed in any::<u64>(), ticks in 1usize..20) {
            let config = VolatilityConfig::default();
            let mut sim = MarketSimulator::with_seed(config, seed).unwrap();
            let mut m = market();
            for _ in 0..ticks {
                let before = m.clone();
                sim.tick(&mut m);
                for (old, new) in before.stocks.iter().zip(m.stocks.iter()) {
                    prop_assert!(within_bound(old.price, new.price, config.stock_pct));
                }
                for (old, new) in before.crypto.iter().zip(m.crypto.iter()) {
                    prop_assert!(within_bound(old.price, new.price, config.crypto_pct));
                }
            }
        }
    }
}

//! Market Data
//!
//! Drives the simulated prices of the classroom market. Each tick moves
//! every stock and crypto asset by an independent uniform percentage drawn
//! from its class bound, and records that percentage as the asset's change.
//!
//! The walk is memoryless and has no floor: over many ticks a price can
//! drift arbitrarily close to zero.

pub mod simulator;

pub use simulator::{MarketSimulator, SimulatorError, TickSummary, VolatilityConfig};

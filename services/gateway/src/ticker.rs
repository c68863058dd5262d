//! Background market ticker

use crate::state::AppState;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Tick the market every `period` until the runtime shuts down
pub fn spawn_market_ticker(state: AppState, period: Duration) -> JoinHandle<()> {
    info!(period_secs = period.as_secs(), "market ticker started");
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; prices move one period after boot
        interval.tick().await;

        loop {
            interval.tick().await;
            match state.tick_market().await {
                Ok((summary, _)) => {
                    debug!(stocks = summary.stocks, crypto = summary.crypto, "market ticked")
                }
                Err(e) => error!(error = %e, "market tick failed"),
            }
        }
    })
}

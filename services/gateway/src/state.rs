use crate::error::AppError;
use ledger::{Ledger, LedgerError};
use market_data::{MarketSimulator, TickSummary};
use std::sync::Arc;
use tokio::sync::Mutex;
use types::market::MarketSnapshot;

/// Everything behind the single lock
pub struct Simulation {
    pub ledger: Ledger,
    pub market: MarketSimulator,
}

/// Shared by every handler and the ticker. All ledger access goes through
/// one mutex, so requests are applied one at a time.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Mutex<Simulation>>,
}

impl AppState {
    pub fn new(ledger: Ledger, market: MarketSimulator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Simulation { ledger, market })),
        }
    }

    /// Run a read against the in-memory state
    pub async fn read<T>(
        &self,
        op: impl FnOnce(&Ledger) -> Result<T, LedgerError>,
    ) -> Result<T, AppError> {
        let guard = self.inner.lock().await;
        op(&guard.ledger).map_err(AppError::from)
    }

    /// Run a mutation. The commit does blocking file I/O, so it runs on the
    /// blocking pool while the owned guard is held.
    pub async fn write<T, F>(&self, op: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Ledger) -> Result<T, LedgerError> + Send + 'static,
    {
        let mut guard = Arc::clone(&self.inner).lock_owned().await;
        tokio::task::spawn_blocking(move || op(&mut guard.ledger))
            .await
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("ledger task failed: {e}")))?
            .map_err(AppError::from)
    }

    /// Advance market prices one step and return the new market
    pub async fn tick_market(&self) -> Result<(TickSummary, MarketSnapshot), AppError> {
        let mut guard = Arc::clone(&self.inner).lock_owned().await;
        tokio::task::spawn_blocking(move || {
            let sim = &mut *guard;
            let summary = sim.ledger.tick_market(&mut sim.market)?;
            Ok::<_, LedgerError>((summary, sim.ledger.market().clone()))
        })
        .await
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("market task failed: {e}")))?
        .map_err(AppError::from)
    }
}

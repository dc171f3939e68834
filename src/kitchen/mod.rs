//! # Kitchen View
//!
//! The staff-facing board of incoming orders.
//!
//! ## Loops
//!
//! [`KitchenView::mount`] starts two independent tasks against the same datastore:
//!
//! - **Refresh** (every `refresh_interval`, first run immediately): fetch all orders,
//!   newest first, and replace the board with the result. A failed fetch is logged and
//!   the board keeps showing the previous orders.
//! - **Cleanup** (every `cleanup_interval`, first run one interval after mount): delete
//!   every order older than `max_order_age`. The board catches up on the next refresh.
//!
//! The loops do not coordinate with each other or with [`KitchenView::delete`]. The board
//! is a cache of the datastore, so whichever result lands last wins, and the next refresh
//! corrects it.
//!
//! ## Teardown
//!
//! [`KitchenView::unmount`] cancels both loops and waits for them to stop. A datastore
//! call that is already in flight is allowed to finish, but its result is thrown away.
//! Dropping a mounted view cancels the loops as well.

pub mod card;
pub mod error;

pub use card::{elapsed_label, orders_label, OrderCard};
pub use error::*;

use crate::model::{OrderId, OrderRecord};
use crate::store::Datastore;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Loop cadence and order lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KitchenSettings {
    pub refresh_interval_ms: u64,
    pub cleanup_interval_ms: u64,
    pub max_order_age_secs: u64,
}

impl Default for KitchenSettings {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 1_000,
            cleanup_interval_ms: 60_000,
            max_order_age_secs: 30 * 60,
        }
    }
}

impl KitchenSettings {
    /// Never shorter than one millisecond; a zero period would stall the loop.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.max(1))
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_millis(self.cleanup_interval_ms.max(1))
    }

    /// Rejects settings a kitchen cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.refresh_interval_ms == 0 {
            return Err("kitchen.refresh_interval_ms must be greater than zero".to_string());
        }
        if self.cleanup_interval_ms == 0 {
            return Err("kitchen.cleanup_interval_ms must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn max_order_age(&self) -> chrono::Duration {
        let secs = i64::try_from(self.max_order_age_secs).unwrap_or(i64::MAX);
        chrono::Duration::try_seconds(secs).unwrap_or(chrono::Duration::MAX)
    }
}

// =============================================================================
// 1. THE BOARD (shared between the view and its loops)
// =============================================================================

#[derive(Debug)]
struct BoardState {
    orders: Vec<OrderRecord>,
    loading: bool,
    torn_down: bool,
}

struct Board {
    store: Option<Arc<dyn Datastore>>,
    max_order_age: chrono::Duration,
    state: Mutex<BoardState>,
}

impl Board {
    fn state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn store(&self) -> Result<&Arc<dyn Datastore>, KitchenError> {
        self.store.as_ref().ok_or(KitchenError::StoreUnavailable)
    }

    async fn refresh(&self) -> Result<usize, KitchenError> {
        let store = self.store()?;
        let result = store.select_all().await;

        let mut state = self.state();
        if state.torn_down {
            debug!("Discarding refresh result after unmount");
            return Ok(0);
        }
        state.loading = false;
        match result {
            Ok(orders) => {
                let count = orders.len();
                state.orders = orders;
                debug!(count, "Board refreshed");
                Ok(count)
            }
            Err(e) => {
                error!(error = %e, "Failed to load orders");
                Err(e.into())
            }
        }
    }

    async fn cleanup_at(&self, now: DateTime<Utc>) -> Result<(), KitchenError> {
        let store = self.store()?;
        let cutoff = now
            .checked_sub_signed(self.max_order_age)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        match store.delete_older_than(cutoff).await {
            Ok(()) => {
                debug!(%cutoff, "Stale orders removed");
                Ok(())
            }
            Err(e) => {
                error!(%cutoff, error = %e, "Failed to remove stale orders");
                Err(e.into())
            }
        }
    }
}

// =============================================================================
// 2. THE VIEW
// =============================================================================

struct Loops {
    token: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

/// One kitchen screen.
pub struct KitchenView {
    board: Arc<Board>,
    settings: KitchenSettings,
    loops: Option<Loops>,
}

impl KitchenView {
    /// Creates an unmounted view with an empty board.
    pub fn new(store: Option<Arc<dyn Datastore>>, settings: KitchenSettings) -> Self {
        Self {
            board: Arc::new(Board {
                store,
                max_order_age: settings.max_order_age(),
                state: Mutex::new(BoardState {
                    orders: Vec::new(),
                    loading: true,
                    torn_down: false,
                }),
            }),
            settings,
            loops: None,
        }
    }

    /// Starts the refresh and cleanup loops. Mounting an already mounted view is a no-op.
    pub fn mount(&mut self) {
        if self.loops.is_some() {
            warn!("Kitchen view already mounted");
            return;
        }

        self.board.state().torn_down = false;
        let token = CancellationToken::new();
        let refresh = tokio::spawn(refresh_loop(
            self.board.clone(),
            self.settings.refresh_interval(),
            token.clone(),
        ));
        let cleanup = tokio::spawn(cleanup_loop(
            self.board.clone(),
            self.settings.cleanup_interval(),
            token.clone(),
        ));

        info!(
            refresh_ms = self.settings.refresh_interval_ms,
            cleanup_ms = self.settings.cleanup_interval_ms,
            "Kitchen view mounted"
        );
        self.loops = Some(Loops {
            token,
            handles: vec![refresh, cleanup],
        });
    }

    pub fn is_mounted(&self) -> bool {
        self.loops.is_some()
    }

    /// Stops both loops and waits until they have exited.
    ///
    /// Results that arrive after this point never reach the board.
    pub async fn unmount(&mut self) {
        self.tear_down();
        if let Some(loops) = self.loops.take() {
            for handle in loops.handles {
                if let Err(e) = handle.await {
                    error!(error = ?e, "Kitchen loop failed");
                }
            }
        }
        info!("Kitchen view unmounted");
    }

    fn tear_down(&self) {
        self.board.state().torn_down = true;
        if let Some(loops) = &self.loops {
            loops.token.cancel();
        }
    }

    // --- Operations ---

    /// Fetches all orders and replaces the board. Returns the number of orders shown.
    pub async fn refresh(&self) -> Result<usize, KitchenError> {
        self.board.refresh().await
    }

    /// Deletes every order older than the configured age, measured from now.
    pub async fn cleanup(&self) -> Result<(), KitchenError> {
        self.board.cleanup_at(Utc::now()).await
    }

    /// Deletes every order older than the configured age, measured from `now`.
    pub async fn cleanup_at(&self, now: DateTime<Utc>) -> Result<(), KitchenError> {
        self.board.cleanup_at(now).await
    }

    /// Deletes one order and drops it from the board right away.
    ///
    /// If the datastore refuses, the order stays on the board.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &OrderId) -> Result<(), KitchenError> {
        let store = self.board.store()?;
        match store.delete_by_id(id).await {
            Ok(()) => {
                let mut state = self.board.state();
                if !state.torn_down {
                    state.orders.retain(|order| &order.id != id);
                }
                info!(order_id = %id, "Order removed from board");
                Ok(())
            }
            Err(e) => {
                error!(order_id = %id, error = %e, "Failed to delete order");
                Err(e.into())
            }
        }
    }

    // --- Board ---

    /// Orders currently on the board, newest first.
    pub fn orders(&self) -> Vec<OrderRecord> {
        self.board.state().orders.clone()
    }

    /// `true` until the first refresh has finished, successfully or not.
    pub fn is_loading(&self) -> bool {
        self.board.state().loading
    }

    /// Render-ready cards for every order on the board.
    pub fn cards(&self, now: DateTime<Utc>) -> Vec<OrderCard> {
        self.board
            .state()
            .orders
            .iter()
            .map(|order| OrderCard::from_record(order, now))
            .collect()
    }
}

impl Drop for KitchenView {
    fn drop(&mut self) {
        self.tear_down();
    }
}

// =============================================================================
// 3. THE LOOPS
// =============================================================================

async fn refresh_loop(board: Arc<Board>, period: Duration, token: CancellationToken) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                // Failures are logged inside; the board keeps its last state
                let _ = board.refresh().await;
            }
        }
    }
    debug!("Refresh loop stopped");
}

async fn cleanup_loop(board: Arc<Board>, period: Duration, token: CancellationToken) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                let _ = board.cleanup_at(Utc::now()).await;
            }
        }
    }
    debug!("Cleanup loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_intervals_are_clamped() {
        let settings = KitchenSettings {
            refresh_interval_ms: 0,
            cleanup_interval_ms: 0,
            ..KitchenSettings::default()
        };
        assert_eq!(settings.refresh_interval(), Duration::from_millis(1));
        assert_eq!(settings.cleanup_interval(), Duration::from_millis(1));
        assert!(settings.validate().is_err());
        assert_eq!(KitchenSettings::default().validate(), Ok(()));
    }
}

//! Dashboard controller: keeps the freshest order collection and its
//! statistics, and owns the transient view state

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::source::OrderSource;
use crate::state::{StateHandle, ViewMode, ViewSnapshot};

/// Consecutive failures after which a fetch problem is logged as persistent
const FAILURE_WARN_THRESHOLD: u32 = 5;

/// Result of one refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RefreshOutcome {
    Updated { orders: usize },
    Failed { error: String },
}

/// Fetches orders into the shared state and mediates view-state changes
#[derive(Clone)]
pub struct DashboardController {
    source: Arc<dyn OrderSource>,
    state: StateHandle,
}

impl std::fmt::Debug for DashboardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardController")
            .field("endpoint", &self.source.endpoint())
            .finish()
    }
}

impl DashboardController {
    pub fn new(source: Arc<dyn OrderSource>, state: StateHandle) -> Self {
        Self { source, state }
    }

    pub fn state(&self) -> StateHandle {
        Arc::clone(&self.state)
    }

    /// Fetch the order collection once.
    ///
    /// On success the collection and statistics are replaced; on failure both
    /// stay as they were and the failure is recorded. Never returns an error.
    /// Overlapping calls are allowed and the last one to finish wins.
    pub async fn refresh(&self) -> RefreshOutcome {
        // Dropping this future mid-fetch drops the guard, which clears the
        // in-flight mark
        let guard = self.state.write().await.begin_refresh();

        let result = self.source.fetch_orders().await;
        let now_ms = current_epoch_ms();

        match result {
            Ok(orders) => {
                let count = orders.len();
                self.state
                    .write()
                    .await
                    .complete_refresh(guard, orders, now_ms);
                tracing::debug!("Refreshed {} orders from {}", count, self.source.endpoint());
                RefreshOutcome::Updated { orders: count }
            }
            Err(e) => {
                let failures = self
                    .state
                    .write()
                    .await
                    .fail_refresh(guard, e.to_string(), now_ms);
                if e.is_fetch_failure() {
                    tracing::warn!(
                        "Error fetching orders from {}: {}",
                        self.source.endpoint(),
                        e
                    );
                } else {
                    tracing::error!(
                        "Unexpected error reading orders from {}: {}",
                        self.source.endpoint(),
                        e
                    );
                }
                if failures == FAILURE_WARN_THRESHOLD {
                    tracing::warn!(
                        "Order fetch from {} has failed {} times in a row",
                        self.source.endpoint(),
                        failures
                    );
                }
                RefreshOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Refresh now and then every `interval` until the returned handle is
    /// cancelled. A zero interval is treated as one millisecond.
    pub fn start_auto_refresh(&self, interval: Duration) -> AutoRefreshHandle {
        let cancel = CancellationToken::new();
        let interval = interval.max(Duration::from_millis(1));
        let controller = self.clone();
        let task_cancel = cancel.clone();

        tracing::info!(
            "Auto refresh of {} every {:?}",
            self.source.endpoint(),
            interval
        );

        let task = tokio::spawn(async move {
            refresh_loop(controller, interval, task_cancel).await;
        });

        AutoRefreshHandle {
            cancel,
            task: Some(task),
        }
    }

    /// Set (`Some`) or clear (`None`) the order shown in the detail view
    pub async fn select_order(&self, id: Option<&str>) -> crate::Result<()> {
        self.state.write().await.select(id)
    }

    pub async fn set_view_mode(&self, mode: ViewMode) {
        self.state.write().await.set_view_mode(mode);
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        self.state.read().await.snapshot()
    }
}

async fn refresh_loop(
    controller: DashboardController,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Auto refresh of {} cancelled", controller.source.endpoint());
                break;
            }
            _ = ticker.tick() => {}
        }

        controller.refresh().await;
    }
}

/// Cancellation handle for a running auto refresh.
///
/// Dropping the handle cancels the schedule. [`AutoRefreshHandle::shutdown`]
/// also waits for a refresh in flight, so no state update happens after it
/// returns.
#[derive(Debug)]
pub struct AutoRefreshHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl AutoRefreshHandle {
    /// Stop scheduling further refreshes
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel and wait for the refresh task to finish
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("Auto refresh task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for AutoRefreshHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn current_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

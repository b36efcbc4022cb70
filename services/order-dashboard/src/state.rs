//! Shared dashboard state: the last fetched orders, their statistics and the
//! transient view state (selection, display mode, loading flag)

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::order::{Order, OrderCard, OrderDetail};
use crate::stats::Stats;

/// Presentation mode of the order collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Grid => write!(f, "grid"),
            ViewMode::List => write!(f, "list"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = crate::DashboardError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "grid" => Ok(ViewMode::Grid),
            "list" => Ok(ViewMode::List),
            other => Err(crate::DashboardError::Config(format!(
                "Unknown view mode '{}', expected 'grid' or 'list'",
                other
            ))),
        }
    }
}

/// Load phase derived from the loading flag and whether data ever arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    NotLoaded,
    Loaded,
    Refreshing,
}

/// Most recent fetch failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    pub message: String,
    pub epoch_ms: u64,
}

/// Settings the presentation layer needs alongside the data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplaySettings {
    pub placeholder_image_url: String,
    pub contact_link_base: String,
}

/// State owned by the controller and read by the dashboard API
#[derive(Debug)]
pub struct DashboardState {
    orders: Vec<Order>,
    stats: Stats,
    selected_id: Option<String>,
    view_mode: ViewMode,
    in_flight: Arc<AtomicU32>,
    loaded: bool,
    last_updated_epoch_ms: Option<u64>,
    last_failure: Option<FetchFailure>,
    consecutive_failures: u32,
    display: DisplaySettings,
}

impl DashboardState {
    pub fn new(view_mode: ViewMode, display: DisplaySettings) -> Self {
        Self {
            orders: Vec::new(),
            stats: Stats::default(),
            selected_id: None,
            view_mode,
            in_flight: Arc::new(AtomicU32::new(0)),
            loaded: false,
            last_updated_epoch_ms: None,
            last_failure: None,
            consecutive_failures: 0,
            display,
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn order(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn display(&self) -> &DisplaySettings {
        &self.display
    }

    pub fn last_failure(&self) -> Option<&FetchFailure> {
        self.last_failure.as_ref()
    }

    pub fn last_updated_epoch_ms(&self) -> Option<u64> {
        self.last_updated_epoch_ms
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// True while at least one refresh is in flight
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Spinner only when there is nothing to show yet
    pub fn show_spinner(&self) -> bool {
        self.is_loading() && self.orders.is_empty()
    }

    pub fn phase(&self) -> LoadPhase {
        match (self.loaded, self.is_loading()) {
            (false, _) => LoadPhase::NotLoaded,
            (true, false) => LoadPhase::Loaded,
            (true, true) => LoadPhase::Refreshing,
        }
    }

    /// Mark a refresh as started. The refresh counts as in flight until
    /// the returned guard is dropped, whether it finishes or is abandoned.
    pub fn begin_refresh(&mut self) -> RefreshGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        RefreshGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    /// Finish a refresh with a fresh collection
    pub fn complete_refresh(&mut self, guard: RefreshGuard, orders: Vec<Order>, now_ms: u64) {
        self.replace_orders(orders, now_ms);
        drop(guard);
    }

    /// Finish a refresh that failed, keeping the current collection.
    /// Returns the number of consecutive failures.
    pub fn fail_refresh(&mut self, guard: RefreshGuard, message: String, now_ms: u64) -> u32 {
        self.last_failure = Some(FetchFailure {
            message,
            epoch_ms: now_ms,
        });
        self.consecutive_failures += 1;
        drop(guard);
        self.consecutive_failures
    }

    /// Replace the collection wholesale and recompute the statistics
    pub fn replace_orders(&mut self, orders: Vec<Order>, now_ms: u64) {
        self.stats = Stats::from_orders(&orders);
        self.orders = orders;
        self.loaded = true;
        self.last_updated_epoch_ms = Some(now_ms);
        self.consecutive_failures = 0;
    }

    /// Set or clear the selected order. A selection must name an order of
    /// the current collection.
    pub fn select(&mut self, id: Option<&str>) -> crate::Result<()> {
        match id {
            Some(id) => {
                if self.order(id).is_none() {
                    return Err(crate::DashboardError::UnknownOrder(id.to_string()));
                }
                self.selected_id = Some(id.to_string());
            }
            None => self.selected_id = None,
        }
        Ok(())
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// The selected order as found in the current collection. `None` when
    /// nothing is selected or the order is absent from the latest fetch.
    pub fn selected_order(&self) -> Option<&Order> {
        self.selected_id.as_deref().and_then(|id| self.order(id))
    }

    /// Detail projection of the selected order
    pub fn selected_detail(&self) -> Option<OrderDetail> {
        self.selected_order()
            .map(|o| o.detail(&self.display.contact_link_base))
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Read-only copy of everything the presentation layer renders
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            orders: self
                .orders
                .iter()
                .map(|o| o.card(&self.display.contact_link_base))
                .collect(),
            stats: self.stats.clone(),
            selected: self.selected_detail(),
            view_mode: self.view_mode,
            phase: self.phase(),
            loading: self.is_loading(),
            show_spinner: self.show_spinner(),
            last_updated_epoch_ms: self.last_updated_epoch_ms,
            last_failure: self.last_failure.clone(),
            consecutive_failures: self.consecutive_failures,
            display: self.display.clone(),
        }
    }
}

/// Marks one refresh as in flight; dropping it clears the mark
#[derive(Debug)]
#[must_use = "the refresh stops counting as in flight when the guard is dropped"]
pub struct RefreshGuard {
    in_flight: Arc<AtomicU32>,
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Serialisable view of the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub orders: Vec<OrderCard>,
    pub stats: Stats,
    pub selected: Option<OrderDetail>,
    pub view_mode: ViewMode,
    pub phase: LoadPhase,
    pub loading: bool,
    pub show_spinner: bool,
    pub last_updated_epoch_ms: Option<u64>,
    pub last_failure: Option<FetchFailure>,
    pub consecutive_failures: u32,
    pub display: DisplaySettings,
}

/// Thread-safe shared state handle
pub type StateHandle = Arc<RwLock<DashboardState>>;

pub fn new_state_handle(view_mode: ViewMode, display: DisplaySettings) -> StateHandle {
    Arc::new(RwLock::new(DashboardState::new(view_mode, display)))
}

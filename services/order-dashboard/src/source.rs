//! Order source trait

use async_trait::async_trait;

use crate::order::Order;

/// Anything that can produce the current order collection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait OrderSource: Send + Sync {
    /// Where orders are read from, for logging
    fn endpoint(&self) -> &str;

    /// Fetch the full order collection. All-or-nothing.
    async fn fetch_orders(&self) -> crate::Result<Vec<Order>>;
}

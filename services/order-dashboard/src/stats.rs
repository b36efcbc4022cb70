//! Order statistics

use rust_decimal::Decimal;
use serde::Serialize;

use crate::order::{format_money, Order};

/// Aggregates over one order collection. Always recomputed in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total_orders: usize,
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
    pub active_orders: usize,
    pub completed_orders: usize,
    /// Revenue and average rendered with two decimals
    pub total_revenue_display: String,
    pub average_order_value_display: String,
}

impl Default for Stats {
    fn default() -> Self {
        Self::from_orders(&[])
    }
}

impl Stats {
    pub fn from_orders(orders: &[Order]) -> Self {
        let total_orders = orders.len();
        let total_revenue = orders
            .iter()
            .fold(Decimal::ZERO, |sum, order| {
                sum.saturating_add(order.pricing.total)
            });
        let completed_orders = orders.iter().filter(|order| order.is_completed()).count();

        let average_order_value = if total_orders > 0 {
            total_revenue
                .checked_div(Decimal::from(total_orders))
                .unwrap_or_default()
        } else {
            Decimal::ZERO
        };

        Self {
            total_orders,
            total_revenue,
            average_order_value,
            active_orders: total_orders - completed_orders,
            completed_orders,
            total_revenue_display: format_money(total_revenue),
            average_order_value_display: format_money(average_order_value),
        }
    }
}

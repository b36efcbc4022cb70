//! Client for the remote order API

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::io::HttpClient;
use crate::order::Order;
use crate::payload::decode_orders;
use crate::source::OrderSource;

/// Reads `GET {base_url}/orders`
pub struct OrderApi {
    url: String,
    placeholder_image_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for OrderApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderApi").field("url", &self.url).finish()
    }
}

impl OrderApi {
    pub fn new(config: &Config, http: Arc<dyn HttpClient>) -> Self {
        let url = config.api.orders_url();
        tracing::debug!("Created OrderApi at {}", url);

        Self {
            url,
            placeholder_image_url: config.display.placeholder_image_url.clone(),
            http,
        }
    }
}

#[async_trait]
impl OrderSource for OrderApi {
    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn fetch_orders(&self) -> crate::Result<Vec<Order>> {
        let response = self.http.get(&self.url).await?;

        if !response.is_success() {
            tracing::debug!(
                "Non-2xx response from {}: status={}",
                self.url,
                response.status
            );
            return Err(crate::DashboardError::Status {
                url: self.url.clone(),
                status: response.status,
            });
        }

        let orders = decode_orders(&response.body, &self.placeholder_image_url)?;
        tracing::debug!("Fetched {} orders from {}", orders.len(), self.url);
        Ok(orders)
    }
}

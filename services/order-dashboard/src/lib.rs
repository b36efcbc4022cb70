//! Order dashboard - polls a remote order API and serves the view state
//!
//! Keeps the freshest order collection with aggregate statistics, tracks the
//! selected order and the grid/list view mode, and builds contact links.

pub mod config;
pub mod contact;
pub mod controller;
pub mod dashboard;
pub mod error;
pub mod io;
pub mod order;
pub mod order_api;
pub mod payload;
pub mod source;
pub mod state;
pub mod stats;

pub use config::{load_config, Config};
pub use error::{DashboardError, Result};

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::controller::DashboardController;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::order_api::OrderApi;
use crate::source::OrderSource;
use crate::state::DisplaySettings;

/// Assembles a [`Dashboard`] from configuration and optional injected parts
pub struct DashboardBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    source: Option<Arc<dyn OrderSource>>,
    cancel: Option<CancellationToken>,
}

impl DashboardBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            source: None,
            cancel: None,
        }
    }

    /// Use this HTTP client for the order API instead of reqwest
    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Read orders from this source instead of the configured API
    pub fn with_order_source(mut self, source: Arc<dyn OrderSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_cancellation_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn build(self) -> Result<Dashboard> {
        self.config.validate()?;

        let source = match self.source {
            Some(source) => source,
            None => {
                let http = match self.http {
                    Some(http) => http,
                    None => Arc::new(ReqwestHttpClient::with_timeout(
                        self.config.api.request_timeout(),
                    )?),
                };
                Arc::new(OrderApi::new(&self.config, http)) as Arc<dyn OrderSource>
            }
        };

        let state = state::new_state_handle(
            self.config.dashboard.default_view_mode,
            DisplaySettings {
                placeholder_image_url: self.config.display.placeholder_image_url.clone(),
                contact_link_base: self.config.contact.link_base.clone(),
            },
        );

        let controller = DashboardController::new(source, state);
        tracing::debug!("Built dashboard for {}", self.config.api.orders_url());

        Ok(Dashboard {
            config: self.config,
            controller,
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

/// A configured dashboard, ready to start
#[derive(Debug)]
pub struct Dashboard {
    config: Config,
    controller: DashboardController,
    cancel: CancellationToken,
}

impl Dashboard {
    pub fn controller(&self) -> &DashboardController {
        &self.controller
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run until the cancellation token fires or ctrl-c is received
    pub async fn start(self) -> Result<()> {
        let cancel = self.cancel;

        let cancel_for_signal = cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                    cancel_for_signal.cancel();
                }
                Err(e) => tracing::warn!("Failed to listen for ctrl-c: {}", e),
            }
        });

        let dashboard_task = if self.config.dashboard.enabled {
            let dashboard_port = self.config.dashboard.port;
            let controller = self.controller.clone();
            let cancel_for_dashboard = cancel.clone();

            Some(tokio::spawn(async move {
                let served = serve_dashboard(controller, dashboard_port, cancel_for_dashboard).await;
                if let Err(e) = served {
                    tracing::error!(
                        "Dashboard on port {} unavailable: {}. Continuing without dashboard.",
                        dashboard_port,
                        e
                    );
                }
            }))
        } else {
            None
        };

        let refresh = self
            .controller
            .start_auto_refresh(self.config.api.refresh_interval());
        tracing::info!("Order dashboard started");

        cancel.cancelled().await;

        refresh.shutdown().await;
        if let Some(task) = dashboard_task {
            if let Err(e) = task
                .await
                .map_err(|e| DashboardError::Dashboard(e.to_string()))
            {
                tracing::warn!("Dashboard task ended abnormally: {}", e);
            }
        }
        tracing::info!("Order dashboard stopped");

        Ok(())
    }
}

/// Serve the dashboard API until `cancel` fires
async fn serve_dashboard(
    controller: DashboardController,
    port: u16,
    cancel: CancellationToken,
) -> Result<()> {
    let router = dashboard::build_router(controller);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Dashboard listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
        })
        .await?;

    tracing::debug!("Dashboard stopped");
    Ok(())
}

/// Run the order dashboard with the given configuration
pub async fn run(config: Config) -> Result<()> {
    DashboardBuilder::new(config).build()?.start().await
}

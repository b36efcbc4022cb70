//! Configuration types for the order dashboard service

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::state::ViewMode;

/// Image shown for purchased items without an image of their own
pub const DEFAULT_PLACEHOLDER_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=150&auto=format&fit=crop";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Reject values the controller cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(crate::DashboardError::Config(
                "api.base_url must not be empty".to_string(),
            ));
        }
        if self.api.refresh_interval_seconds == 0 {
            return Err(crate::DashboardError::Config(
                "api.refresh_interval_seconds must be greater than zero".to_string(),
            ));
        }
        if self.api.request_timeout_seconds == 0 {
            return Err(crate::DashboardError::Config(
                "api.request_timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Remote order API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
}

impl ApiConfig {
    /// URL of the order collection endpoint
    pub fn orders_url(&self) -> String {
        format!("{}/orders", self.base_url.trim_end_matches('/'))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_seconds: default_request_timeout(),
            refresh_interval_seconds: default_refresh_interval(),
        }
    }
}

/// Dashboard API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
    #[serde(default)]
    pub default_view_mode: ViewMode,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_dashboard_port(),
            default_view_mode: ViewMode::default(),
        }
    }
}

/// Customer contact link settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    #[serde(default = "default_link_base")]
    pub link_base: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            link_base: default_link_base(),
        }
    }
}

/// Presentation defaults resolved during payload normalisation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_placeholder_image_url")]
    pub placeholder_image_url: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            placeholder_image_url: default_placeholder_image_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

fn default_refresh_interval() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_dashboard_port() -> u16 {
    11120
}

fn default_link_base() -> String {
    "https://wa.me".to_string()
}

fn default_placeholder_image_url() -> String {
    DEFAULT_PLACEHOLDER_IMAGE_URL.to_string()
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::DashboardError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}

//! Error types for the order dashboard service

/// Errors that can occur in the order dashboard service
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("HTTP request timed out: {0}")]
    Timeout(String),

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown order: {0}")]
    UnknownOrder(String),

    #[error("Dashboard error: {0}")]
    Dashboard(String),
}

impl DashboardError {
    /// True for the errors that make up a failed order fetch: the request
    /// did not complete, returned a non-2xx status, or carried a body that
    /// is not an order envelope.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            DashboardError::Http(_)
                | DashboardError::Timeout(_)
                | DashboardError::Status { .. }
                | DashboardError::Json(_)
        )
    }
}

/// Result type alias for order dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

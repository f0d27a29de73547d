//! Error types
//!
//! Configuration errors are fatal at construction. Everything else is
//! contained to one connection, one message or one subscriber.

use thiserror::Error;

use crate::entropy::{MAX_BINS, MAX_WINDOW};

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid UTF-8 payload: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Invalid construction parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("window must be between 1 and {max}, got {0}", max = MAX_WINDOW)]
    InvalidWindow(usize),

    #[error("bins must be between 1 and {max}, got {0}", max = MAX_BINS)]
    InvalidBins(usize),

    #[error("sampling interval must be finite and positive, got {0}")]
    InvalidInterval(f64),

    #[error("subscriber queue capacity must be at least 1, got {0}")]
    InvalidQueueCapacity(usize),
}

impl Error {
    /// Check if this error came from configuration validation
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::InvalidBins(0).to_string(),
            "bins must be between 1 and 65536, got 0"
        );
        assert_eq!(
            ConfigError::InvalidInterval(-0.5).to_string(),
            "sampling interval must be finite and positive, got -0.5"
        );
    }

    #[test]
    fn test_config_error_converts() {
        let err: Error = ConfigError::InvalidWindow(0).into();
        assert!(err.is_config());
        assert_eq!(
            err.to_string(),
            "Configuration error: window must be between 1 and 1048576, got 0"
        );
    }

    #[test]
    fn test_io_error_is_not_config() {
        let err: Error = std::io::Error::other("boom").into();
        assert!(!err.is_config());
    }
}

//! Server configuration

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::coordinator::CoordinatorConfig;
use crate::error::ConfigError;
use crate::source::SourceKind;

/// Default WebSocket port
pub const DEFAULT_PORT: u16 = 8765;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Maximum concurrent connections (0 = unlimited)
    pub max_connections: usize,

    /// Enable TCP_NODELAY (disable Nagle's algorithm)
    pub tcp_nodelay: bool,

    /// Interval between keep-alive pings
    pub ping_interval: Duration,

    /// Extra time allowed for a peer to answer before it is dropped
    pub ping_timeout: Duration,

    /// Stats log interval
    pub stats_interval: Duration,

    /// Pipeline and fan-out options
    pub coordinator: CoordinatorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            max_connections: 0, // Unlimited
            tcp_nodelay: true,  // Frames are small and latency-sensitive
            ping_interval: Duration::from_secs(20),
            ping_timeout: Duration::from_secs(20),
            stats_interval: Duration::from_secs(30),
            coordinator: CoordinatorConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set maximum connections
    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the keep-alive ping interval and answer timeout
    pub fn keep_alive(mut self, interval: Duration, timeout: Duration) -> Self {
        self.ping_interval = interval;
        self.ping_timeout = timeout;
        self
    }

    /// Set the source selected at start
    pub fn default_source(mut self, source: SourceKind) -> Self {
        self.coordinator = self.coordinator.default_source(source);
        self
    }

    /// Set estimator window and bucket count
    pub fn estimator(mut self, window: usize, bins: usize) -> Self {
        self.coordinator = self.coordinator.window(window).bins(bins);
        self
    }

    /// Set the per-subscriber queue depth
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.coordinator = self.coordinator.queue_capacity(capacity);
        self
    }

    /// Time without any traffic from a peer before it is dropped
    pub fn idle_timeout(&self) -> Duration {
        self.ping_interval + self.ping_timeout
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.coordinator.validate()
    }
}

//! Entropy aquarium
//!
//! Computes a rolling entropy signature of a scalar telemetry stream and
//! broadcasts it as JSON frames to any number of WebSocket observers.
//!
//! # Architecture
//!
//! ```text
//!   SourceFeed ──► EntropyEstimator ──► Frame::build
//!   (interval)      (window, bins)       (geometry)
//!                                           │
//!                                           ▼
//!                              BroadcastCoordinator
//!                       ┌────────────────────────────────┐
//!                       │ selection: RwLock<Selection>   │
//!                       │ epoch:     watch::Sender<u64>  │
//!                       │ registry:  SubscriberRegistry  │
//!                       └───────────────┬────────────────┘
//!                                       │ broadcast()
//!                  ┌────────────────────┼────────────────────┐
//!                  ▼                    ▼                    ▼
//!             [Connection]         [Connection]         [Connection]
//!             mpsc → WS sink       mpsc → WS sink       mpsc → WS sink
//! ```
//!
//! Exactly one pipeline run is active at a time. A source switch bumps the
//! selection epoch, and the running pipeline stops at its next sample (or
//! immediately, if it is waiting on the source's interval).

pub mod coordinator;
pub mod entropy;
pub mod error;
pub mod frame;
pub mod registry;
pub mod server;
pub mod source;
pub mod stats;

pub use coordinator::{BroadcastCoordinator, Selection};
pub use entropy::{EntropyEstimator, EstimatorConfig, StateVector};
pub use error::{ConfigError, Error, Result};
pub use frame::{Frame, Heading};
pub use registry::{SubscriberId, SubscriberRegistry};
pub use server::{AquariumServer, ServerConfig};
pub use source::{Sample, SourceFeed, SourceKind};

//! Pipeline and registry counters

pub mod metrics;

pub use metrics::{PipelineCounters, PipelineStats, RegistryCounters, RegistryStats, ServerStats};

//! Source selection state

use crate::source::SourceKind;

/// The active source and its epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub source: SourceKind,
    /// Incremented on every change of `source`
    pub epoch: u64,
}

impl Selection {
    pub fn new(source: SourceKind) -> Self {
        Self { source, epoch: 0 }
    }

    /// Select `source`; returns true if the selection changed
    pub fn select(&mut self, source: SourceKind) -> bool {
        if source == self.source {
            return false;
        }
        self.source = source;
        self.epoch += 1;
        true
    }
}

/// Result of a switch request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchOutcome {
    /// Source in effect after the request
    pub source: SourceKind,
    pub epoch: u64,
    /// Whether the request replaced the active source
    pub changed: bool,
}

/// Lifecycle of the coordinator's pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// No pipeline task is running
    Idle,
    /// A pipeline task is sampling `source`
    Running { epoch: u64, source: SourceKind },
}

//! Statistics for the broadcast pipeline and the subscriber set
//!
//! Counters are relaxed atomics updated on the hot path; the `*Stats` types
//! are plain snapshots.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters for the estimation pipeline
#[derive(Debug, Default)]
pub struct PipelineCounters {
    /// Pipeline runs started (one per source selection)
    pub runs: AtomicU64,
    /// Samples consumed from feeds
    pub samples: AtomicU64,
    /// Samples that produced no state vector (warm-up)
    pub warmup_skipped: AtomicU64,
    /// Frames handed to the registry
    pub frames: AtomicU64,
}

impl PipelineCounters {
    pub fn snapshot(&self) -> PipelineStats {
        PipelineStats {
            runs: self.runs.load(Ordering::Relaxed),
            samples: self.samples.load(Ordering::Relaxed),
            warmup_skipped: self.warmup_skipped.load(Ordering::Relaxed),
            frames: self.frames.load(Ordering::Relaxed),
        }
    }
}

/// Pipeline statistics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub runs: u64,
    pub samples: u64,
    pub warmup_skipped: u64,
    pub frames: u64,
}

/// Live counters for the subscriber registry
#[derive(Debug, Default)]
pub struct RegistryCounters {
    pub joined: AtomicU64,
    pub left: AtomicU64,
    /// Subscribers removed because delivery failed
    pub evicted: AtomicU64,
    /// Non-empty broadcasts performed
    pub broadcasts: AtomicU64,
    /// Payloads accepted by subscriber queues
    pub deliveries: AtomicU64,
}

impl RegistryCounters {
    pub fn snapshot(&self, subscribers: usize) -> RegistryStats {
        RegistryStats {
            subscribers,
            joined: self.joined.load(Ordering::Relaxed),
            left: self.left.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
        }
    }
}

/// Registry statistics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Current subscribers
    pub subscribers: usize,
    pub joined: u64,
    pub left: u64,
    pub evicted: u64,
    pub broadcasts: u64,
    pub deliveries: u64,
}

/// Server-wide statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStats {
    /// Active source name
    pub source: String,
    /// Current selection epoch
    pub epoch: u64,
    pub pipeline: PipelineStats,
    pub registry: RegistryStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_snapshot() {
        let counters = PipelineCounters::default();
        assert_eq!(counters.snapshot(), PipelineStats::default());

        counters.runs.fetch_add(1, Ordering::Relaxed);
        counters.samples.fetch_add(40, Ordering::Relaxed);
        counters.warmup_skipped.fetch_add(31, Ordering::Relaxed);
        counters.frames.fetch_add(9, Ordering::Relaxed);

        assert_eq!(
            counters.snapshot(),
            PipelineStats {
                runs: 1,
                samples: 40,
                warmup_skipped: 31,
                frames: 9,
            }
        );
    }

    #[test]
    fn test_registry_snapshot() {
        let counters = RegistryCounters::default();
        counters.joined.fetch_add(3, Ordering::Relaxed);
        counters.evicted.fetch_add(1, Ordering::Relaxed);

        let stats = counters.snapshot(2);
        assert_eq!(stats.subscribers, 2);
        assert_eq!(stats.joined, 3);
        assert_eq!(stats.evicted, 1);
        assert_eq!(stats.left, 0);
    }
}

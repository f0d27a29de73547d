//! Timed sample feed
//!
//! A feed pairs a generator with a tokio interval. The first sample is
//! available immediately, later ones once per `dt`. Dropping the feed stops
//! it; nothing is produced in the background.

use std::time::{Duration, Instant};

use tokio::time::{self, Interval, MissedTickBehavior};

use super::kind::SourceKind;
use super::signal::{SampleSource, Signal};

/// A timestamped scalar observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// When the sample was taken
    pub at: Instant,
    /// Observed value, nominally in [0,1]
    pub value: f64,
}

/// Paced sample producer for one source
#[derive(Debug)]
pub struct SourceFeed {
    signal: Signal,
    ticker: Interval,
    produced: u64,
}

impl SourceFeed {
    /// Open a feed for `kind` at its nominal interval
    pub fn open(kind: SourceKind) -> Self {
        Self::with_signal(Signal::for_kind(kind))
    }

    /// Open a feed driven by an existing generator
    pub fn with_signal(signal: Signal) -> Self {
        let mut ticker = time::interval(signal.kind().interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            signal,
            ticker,
            produced: 0,
        }
    }

    /// Source this feed samples
    pub fn kind(&self) -> SourceKind {
        self.signal.kind()
    }

    /// Nominal sampling interval in seconds
    pub fn dt(&self) -> f64 {
        self.kind().dt()
    }

    /// Nominal sampling interval
    pub fn interval(&self) -> Duration {
        self.ticker.period()
    }

    /// Number of samples produced so far
    pub fn produced(&self) -> u64 {
        self.produced
    }

    /// Wait for the next tick and take a sample
    ///
    /// Cancel-safe: dropping the future before the tick completes loses no
    /// sample.
    pub async fn next(&mut self) -> Sample {
        self.ticker.tick().await;
        self.produced += 1;

        Sample {
            at: Instant::now(),
            value: self.signal.next_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_sample_is_immediate() {
        let mut feed = SourceFeed::with_signal(Signal::seeded(SourceKind::Weather, 1));
        let start = time::Instant::now();

        let sample = feed.next().await;

        assert!((0.0..=1.0).contains(&sample.value));
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(feed.produced(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_samples_are_paced_by_dt() {
        let mut feed = SourceFeed::with_signal(Signal::seeded(SourceKind::Weather, 1));
        let start = time::Instant::now();

        for _ in 0..5 {
            feed.next().await;
        }

        assert_eq!(start.elapsed(), Duration::from_millis(2_000));
        assert_eq!(feed.interval(), Duration::from_millis(500));
        assert_eq!(feed.dt(), 0.5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_uses_source_interval() {
        let feed = SourceFeed::open(SourceKind::Stocks);
        assert_eq!(feed.kind(), SourceKind::Stocks);
        assert_eq!(feed.interval(), Duration::from_millis(200));
    }
}

//! Rolling-window entropy estimator

use std::collections::VecDeque;

use crate::error::ConfigError;

/// Smallest warm-up threshold regardless of window size
const MIN_WARMUP: usize = 8;

/// Largest accepted history window
pub const MAX_WINDOW: usize = 1 << 20;

/// Largest accepted histogram bucket count
pub const MAX_BINS: usize = 1 << 16;

/// Estimator parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorConfig {
    /// History capacity in samples
    pub window: usize,
    /// Number of histogram buckets over [0,1]
    pub bins: usize,
    /// Sampling interval in seconds
    pub dt: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            window: 128,
            bins: 32,
            dt: 0.1,
        }
    }
}

impl EstimatorConfig {
    /// Set the history window
    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Set the number of histogram buckets
    pub fn bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    /// Set the sampling interval in seconds
    pub fn dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Reject parameters the estimator cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_WINDOW).contains(&self.window) {
            return Err(ConfigError::InvalidWindow(self.window));
        }
        if !(1..=MAX_BINS).contains(&self.bins) {
            return Err(ConfigError::InvalidBins(self.bins));
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidInterval(self.dt));
        }
        Ok(())
    }

    /// History size at which the first state vector is produced
    pub fn warmup_threshold(&self) -> usize {
        MIN_WARMUP.max(self.window / 4)
    }
}

/// Entropy and its time derivatives
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StateVector {
    /// Normalized entropy in [0,1]
    pub h: f64,
    /// First derivative, per second
    pub dh: f64,
    /// Second derivative, per second squared
    pub ddh: f64,
}

impl StateVector {
    pub fn new(h: f64, dh: f64, ddh: f64) -> Self {
        Self { h, dh, ddh }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.h, self.dh, self.ddh]
    }
}

/// Streaming estimator over a bounded history
///
/// Note: the window is never large enough to reach the warm-up threshold
/// when `window < 8`, so such an estimator never yields.
#[derive(Debug, Clone)]
pub struct EntropyEstimator {
    config: EstimatorConfig,
    history: VecDeque<f64>,
    counts: Vec<usize>,
    prev_h: Option<f64>,
    prev_dh: Option<f64>,
}

impl EntropyEstimator {
    /// Create an estimator, validating its parameters
    pub fn new(config: EstimatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            history: VecDeque::new(),
            counts: vec![0; config.bins],
            prev_h: None,
            prev_dh: None,
        })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn warmup_threshold(&self) -> usize {
        self.config.warmup_threshold()
    }

    /// Whether the history is large enough to produce output
    pub fn is_warm(&self) -> bool {
        self.history.len() >= self.warmup_threshold()
    }

    /// Forget all history and derivative memory
    pub fn reset(&mut self) {
        self.history.clear();
        self.prev_h = None;
        self.prev_dh = None;
    }

    /// Feed one sample
    ///
    /// Returns `None` while warming up.
    pub fn step(&mut self, x: f64) -> Option<StateVector> {
        if self.history.len() == self.config.window {
            self.history.pop_front();
        }
        self.history.push_back(x);

        if !self.is_warm() {
            return None;
        }

        let h = self.entropy();
        let dh = match self.prev_h {
            Some(prev) => (h - prev) / self.config.dt,
            None => 0.0,
        };
        let ddh = match self.prev_dh {
            Some(prev) => (dh - prev) / self.config.dt,
            None => 0.0,
        };

        self.prev_h = Some(h);
        self.prev_dh = Some(dh);

        Some(StateVector { h, dh, ddh })
    }

    /// Normalized Shannon entropy of the current history
    fn entropy(&mut self) -> f64 {
        let bins = self.config.bins;
        self.counts.iter_mut().for_each(|c| *c = 0);

        let mut total = 0usize;
        for &x in &self.history {
            if let Some(idx) = bucket_index(x, bins) {
                self.counts[idx] += 1;
                total += 1;
            }
        }

        if total == 0 || bins == 1 {
            return 0.0;
        }

        let total = total as f64;
        let mut h = 0.0;
        for &count in self.counts.iter().filter(|&&c| c > 0) {
            let p = count as f64 / total;
            h -= p * p.log2();
        }

        h / (bins as f64).log2()
    }
}

/// Bucket for `x` among `bins` equal-width buckets over [0,1]
///
/// The last bucket is closed on the right. Values outside the range (and
/// NaN) belong to no bucket.
fn bucket_index(x: f64, bins: usize) -> Option<usize> {
    if !(0.0..=1.0).contains(&x) {
        return None;
    }
    let idx = (x * bins as f64) as usize;
    Some(idx.min(bins - 1))
}

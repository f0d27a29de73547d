//! Coordinator configuration

use crate::entropy::EstimatorConfig;
use crate::error::ConfigError;
use crate::registry::store::DEFAULT_QUEUE_CAPACITY;
use crate::source::SourceKind;

/// Pipeline and fan-out options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinatorConfig {
    /// Source selected at start and for unknown names
    pub default_source: SourceKind,

    /// Estimator history window in samples
    pub window: usize,

    /// Estimator histogram buckets
    pub bins: usize,

    /// Per-subscriber queue depth
    pub queue_capacity: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            default_source: SourceKind::DEFAULT,
            window: 128,
            bins: 32,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl CoordinatorConfig {
    /// Set the default source
    pub fn default_source(mut self, source: SourceKind) -> Self {
        self.default_source = source;
        self
    }

    /// Set the estimator window
    pub fn window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Set the estimator bucket count
    pub fn bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    /// Set the per-subscriber queue depth
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Estimator parameters for a run on `source`
    pub fn estimator_for(&self, source: SourceKind) -> EstimatorConfig {
        EstimatorConfig {
            window: self.window,
            bins: self.bins,
            dt: source.dt(),
        }
    }

    /// Check that every source can be estimated with these parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        for source in SourceKind::ALL {
            self.estimator_for(source).validate()?;
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::InvalidQueueCapacity(0));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::{EntropyEstimator, MAX_BINS, MAX_WINDOW};

    #[test]
    fn test_default_config() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.default_source, SourceKind::Synthetic);
        assert_eq!(config.window, 128);
        assert_eq!(config.bins, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_estimator_uses_source_interval() {
        let config = CoordinatorConfig::default().window(64).bins(16);
        let est = config.estimator_for(SourceKind::Stocks);
        assert_eq!(est, EstimatorConfig { window: 64, bins: 16, dt: 0.2 });
    }

    #[test]
    fn test_validate_rejects() {
        assert_eq!(
            CoordinatorConfig::default().window(0).validate(),
            Err(ConfigError::InvalidWindow(0))
        );
        assert_eq!(
            CoordinatorConfig::default().bins(0).validate(),
            Err(ConfigError::InvalidBins(0))
        );
        assert_eq!(
            CoordinatorConfig::default().queue_capacity(0).validate(),
            Err(ConfigError::InvalidQueueCapacity(0))
        );
    }

    #[test]
    fn test_validate_rejects_oversized_estimator() {
        assert_eq!(
            CoordinatorConfig::default().window(usize::MAX / 2).validate(),
            Err(ConfigError::InvalidWindow(usize::MAX / 2))
        );
        assert_eq!(
            CoordinatorConfig::default().bins(usize::MAX).validate(),
            Err(ConfigError::InvalidBins(usize::MAX))
        );
    }

    #[test]
    fn test_every_source_estimator_builds() {
        let config = CoordinatorConfig::default().window(MAX_WINDOW).bins(MAX_BINS);
        assert!(config.validate().is_ok());
        for source in SourceKind::ALL {
            assert!(EntropyEstimator::new(config.estimator_for(source)).is_ok());
        }
    }
}

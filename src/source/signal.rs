//! Placeholder signal generators
//!
//! Each generator produces values clamped to [0,1], one per call, advancing
//! its internal clock by its source's `dt`. Generators own a seedable RNG so
//! tests can reproduce a sequence.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::kind::SourceKind;

/// A producer of scalar samples in [0,1]
pub trait SampleSource {
    /// Produce the next value and advance the generator clock
    fn next_value(&mut self) -> f64;
}

/// Smooth oscillation with noise and rare chaos injection
#[derive(Debug)]
pub struct SyntheticSignal {
    rng: StdRng,
    t: f64,
    dt: f64,
    phase: f64,
}

impl SyntheticSignal {
    const PERIOD_S: f64 = 5.0;
    const NOISE: f64 = 0.05;
    const SPIKE_PROB: f64 = 0.02;

    pub fn new(dt: f64, mut rng: StdRng) -> Self {
        let phase = rng.random::<f64>();
        Self { rng, t: 0.0, dt, phase }
    }
}

impl SampleSource for SyntheticSignal {
    fn next_value(&mut self) -> f64 {
        let mut val = 0.5 + 0.45 * (2.0 * PI * (self.t / Self::PERIOD_S + self.phase)).sin();
        val += self.rng.random_range(-Self::NOISE..=Self::NOISE);
        if self.rng.random_bool(Self::SPIKE_PROB) {
            val = self.rng.random::<f64>();
        }
        self.t += self.dt;
        val.clamp(0.0, 1.0)
    }
}

/// Slow, smooth drift
#[derive(Debug)]
pub struct WeatherSignal {
    rng: StdRng,
    t: f64,
    dt: f64,
}

impl WeatherSignal {
    const NOISE: f64 = 0.02;

    pub fn new(dt: f64, rng: StdRng) -> Self {
        Self { rng, t: 0.0, dt }
    }
}

impl SampleSource for WeatherSignal {
    fn next_value(&mut self) -> f64 {
        let val = 0.45
            + 0.2 * (self.t / 15.0).sin()
            + self.rng.random_range(-Self::NOISE..=Self::NOISE);
        self.t += self.dt;
        val.clamp(0.0, 1.0)
    }
}

/// Bounded random walk with occasional spikes
#[derive(Debug)]
pub struct StocksSignal {
    rng: StdRng,
    drift: f64,
}

impl StocksSignal {
    const STEP: f64 = 0.02;
    const MAX_DRIFT: f64 = 0.3;
    const NOISE: f64 = 0.05;
    const SPIKE_PROB: f64 = 0.02;

    pub fn new(rng: StdRng) -> Self {
        Self { rng, drift: 0.0 }
    }
}

impl SampleSource for StocksSignal {
    fn next_value(&mut self) -> f64 {
        self.drift = (self.drift + self.rng.random_range(-Self::STEP..=Self::STEP))
            .clamp(-Self::MAX_DRIFT, Self::MAX_DRIFT);
        let mut val = 0.5 + self.drift + self.rng.random_range(-Self::NOISE..=Self::NOISE);
        if self.rng.random_bool(Self::SPIKE_PROB) {
            val = self.rng.random::<f64>();
        }
        val.clamp(0.0, 1.0)
    }
}

/// Generator for one of the known sources
#[derive(Debug)]
pub enum Signal {
    Synthetic(SyntheticSignal),
    Weather(WeatherSignal),
    Stocks(StocksSignal),
}

impl Signal {
    /// Create the generator for `kind`, seeded from the OS
    pub fn for_kind(kind: SourceKind) -> Self {
        Self::with_rng(kind, StdRng::from_os_rng())
    }

    /// Create a reproducible generator for `kind`
    pub fn seeded(kind: SourceKind, seed: u64) -> Self {
        Self::with_rng(kind, StdRng::seed_from_u64(seed))
    }

    fn with_rng(kind: SourceKind, rng: StdRng) -> Self {
        match kind {
            SourceKind::Synthetic => Signal::Synthetic(SyntheticSignal::new(kind.dt(), rng)),
            SourceKind::Weather => Signal::Weather(WeatherSignal::new(kind.dt(), rng)),
            SourceKind::Stocks => Signal::Stocks(StocksSignal::new(rng)),
        }
    }

    /// Source this generator belongs to
    pub fn kind(&self) -> SourceKind {
        match self {
            Signal::Synthetic(_) => SourceKind::Synthetic,
            Signal::Weather(_) => SourceKind::Weather,
            Signal::Stocks(_) => SourceKind::Stocks,
        }
    }
}

impl SampleSource for Signal {
    fn next_value(&mut self) -> f64 {
        match self {
            Signal::Synthetic(s) => s.next_value(),
            Signal::Weather(s) => s.next_value(),
            Signal::Stocks(s) => s.next_value(),
        }
    }
}

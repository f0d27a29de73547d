//! Scalar sample sources
//!
//! A source is one of a fixed set of named signals, each sampled at its own
//! nominal interval. The pipeline only sees the [`SourceFeed`] contract:
//! await the next [`Sample`], read `dt`.

pub mod feed;
pub mod kind;
pub mod signal;

pub use feed::{Sample, SourceFeed};
pub use kind::SourceKind;
pub use signal::{SampleSource, Signal, StocksSignal, SyntheticSignal, WeatherSignal};

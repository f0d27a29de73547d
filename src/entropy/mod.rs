//! Streaming entropy estimation
//!
//! Turns a scalar stream into `(H, dH, ddH)` state vectors: normalized
//! Shannon entropy of a rolling histogram, and its first and second finite
//! differences per unit time.

pub mod estimator;

pub use estimator::{EntropyEstimator, EstimatorConfig, StateVector, MAX_BINS, MAX_WINDOW};

//! Frame geometry
//!
//! The state vector `(H, dH, ddH)` is treated as an arrow in 3-space. A frame
//! carries its magnitude, heading, the reversed arrow and the angle between
//! the two. Degenerate (zero) vectors get zero angles rather than NaN.

use serde::Serialize;

use crate::entropy::StateVector;

/// Strategy marker attached to every frame
pub const RESPONSE_STRATEGY_HINT: &str = "simple-reverse";

/// Direction of the arrow, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Heading {
    /// Angle in the (H, dH) plane
    pub azimuth: f64,
    /// Angle above the (H, dH) plane
    pub elevation: f64,
}

/// Immutable description of one state vector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub source: String,
    #[serde(rename = "arrow_vector")]
    pub vector: [f64; 3],
    #[serde(rename = "arrow_magnitude")]
    pub magnitude: f64,
    #[serde(rename = "arrow_heading_deg")]
    pub heading: Heading,
    #[serde(rename = "suggested_opp_vector")]
    pub suggested_opposite_vector: [f64; 3],
    #[serde(rename = "opp_angle_offset_deg")]
    pub offset_angle: f64,
    pub response_strategy_hint: &'static str,
}

impl Frame {
    /// Build the frame for `state`, labelled with `source`
    pub fn build(state: StateVector, source: impl Into<String>) -> Self {
        let StateVector { h, dh, ddh } = state;
        let vector = [h, dh, ddh];
        let opposite = [-h, -dh, -ddh];
        let magnitude = (h * h + dh * dh + ddh * ddh).sqrt();

        let azimuth = if h == 0.0 && dh == 0.0 {
            0.0
        } else {
            dh.atan2(h).to_degrees()
        };
        let elevation = if h == 0.0 && dh == 0.0 && ddh == 0.0 {
            0.0
        } else {
            ddh.atan2((h * h + dh * dh).sqrt()).to_degrees()
        };

        Self {
            source: source.into(),
            vector,
            magnitude,
            heading: Heading { azimuth, elevation },
            suggested_opposite_vector: opposite,
            offset_angle: offset_angle(&vector, &opposite, magnitude),
            response_strategy_hint: RESPONSE_STRATEGY_HINT,
        }
    }
}

/// Angle between `v` and `opp` in degrees, both of length `magnitude`
fn offset_angle(v: &[f64; 3], opp: &[f64; 3], magnitude: f64) -> f64 {
    if magnitude == 0.0 {
        return 0.0;
    }

    let denom = magnitude * magnitude;
    if !denom.is_finite() {
        // |v|^2 overflowed; `opp` is the exact negation of `v`.
        return 180.0;
    }

    let dot = v[0] * opp[0] + v[1] * opp[1] + v[2] * opp[2];
    (dot / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

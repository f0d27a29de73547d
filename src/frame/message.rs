//! JSON wire messages
//!
//! Server to client:
//!
//! ```text
//! {"type":"notice","message":"connected","source":"synthetic","sources":[...]}
//! {"type":"notice","message":"switched to weather","source":"weather"}
//! {"type":"frame","source":"synthetic","arrow_vector":[..], ..., "stats":{..}}
//! ```
//!
//! Client to server:
//!
//! ```text
//! {"action":"switch","source":"weather"}
//! ```

use serde::{Deserialize, Serialize};

use crate::entropy::EstimatorConfig;

use super::builder::Frame;

/// Informational message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub message: String,
    pub source: String,
    /// Only present in the greeting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

/// Estimator parameters attached to each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameStats {
    pub bins: usize,
    pub window: usize,
    /// Sampling rate, rounded to two decimals
    pub rate_hz: f64,
}

impl FrameStats {
    pub fn from_config(config: &EstimatorConfig) -> Self {
        Self {
            bins: config.bins,
            window: config.window,
            rate_hz: (100.0 / config.dt).round() / 100.0,
        }
    }
}

/// A frame plus its delivery metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameMessage {
    #[serde(flatten)]
    pub frame: Frame,
    pub stats: FrameStats,
}

/// Message sent from the server to observers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Notice(Notice),
    Frame(FrameMessage),
}

impl ServerMessage {
    /// Greeting sent to a newly joined subscriber
    pub fn greeting(source: &str, sources: Vec<String>) -> Self {
        ServerMessage::Notice(Notice {
            message: "connected".to_string(),
            source: source.to_string(),
            sources: Some(sources),
        })
    }

    /// Confirmation broadcast after a switch request
    pub fn switched(source: &str) -> Self {
        ServerMessage::Notice(Notice {
            message: format!("switched to {}", source),
            source: source.to_string(),
            sources: None,
        })
    }

    pub fn frame(frame: Frame, stats: FrameStats) -> Self {
        ServerMessage::Frame(FrameMessage { frame, stats })
    }

    /// Wire value of the `type` field
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::Notice(_) => "notice",
            ServerMessage::Frame(_) => "frame",
        }
    }
}

/// Control message sent by an observer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Select a different source; a missing name means the default source
    Switch {
        #[serde(default)]
        source: Option<String>,
    },
}

impl ClientMessage {
    /// Decode a text message
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::entropy::StateVector;

    #[test]
    fn test_greeting_shape() {
        let msg = ServerMessage::greeting("synthetic", vec!["synthetic".into(), "weather".into()]);
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "type": "notice",
                "message": "connected",
                "source": "synthetic",
                "sources": ["synthetic", "weather"],
            })
        );
    }

    #[test]
    fn test_switch_notice_omits_sources() {
        let msg = ServerMessage::switched("weather");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "type": "notice",
                "message": "switched to weather",
                "source": "weather",
            })
        );
        assert_eq!(msg.kind(), "notice");
    }

    #[test]
    fn test_frame_shape() {
        let frame = Frame::build(StateVector::new(0.0, 0.0, 0.0), "synthetic");
        let stats = FrameStats::from_config(&EstimatorConfig::default());
        let msg = ServerMessage::frame(frame, stats);

        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "type": "frame",
                "source": "synthetic",
                "arrow_vector": [0.0, 0.0, 0.0],
                "arrow_magnitude": 0.0,
                "arrow_heading_deg": {"azimuth": 0.0, "elevation": 0.0},
                "suggested_opp_vector": [-0.0, -0.0, -0.0],
                "opp_angle_offset_deg": 0.0,
                "response_strategy_hint": "simple-reverse",
                "stats": {"bins": 32, "window": 128, "rate_hz": 10.0},
            })
        );
        assert_eq!(msg.kind(), "frame");
    }

    #[test]
    fn test_rate_is_rounded() {
        let stats = FrameStats::from_config(&EstimatorConfig::default().dt(0.3));
        assert_eq!(stats.rate_hz, 3.33);
        let stats = FrameStats::from_config(&EstimatorConfig::default().dt(0.5));
        assert_eq!(stats.rate_hz, 2.0);
    }

    #[test]
    fn test_parse_switch() {
        assert_eq!(
            ClientMessage::parse(r#"{"action":"switch","source":"weather"}"#).unwrap(),
            ClientMessage::Switch {
                source: Some("weather".into())
            }
        );
        assert_eq!(
            ClientMessage::parse(r#"{"action":"switch"}"#).unwrap(),
            ClientMessage::Switch { source: None }
        );
        // Unknown fields are tolerated.
        assert!(ClientMessage::parse(r#"{"action":"switch","source":"x","id":3}"#).is_ok());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for text in [
            "",
            "not json",
            "[]",
            r#"{"source":"weather"}"#,
            r#"{"action":"pause"}"#,
            r#"{"action":"switch","source":5}"#,
        ] {
            assert!(ClientMessage::parse(text).is_err(), "accepted {text:?}");
        }
    }
}

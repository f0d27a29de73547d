//! Frames and wire messages
//!
//! [`Frame::build`] maps a state vector to its geometric description.
//! [`ServerMessage`] and [`ClientMessage`] are the JSON shapes exchanged
//! with observers.

pub mod builder;
pub mod message;

pub use builder::{Frame, Heading, RESPONSE_STRATEGY_HINT};
pub use message::{ClientMessage, FrameMessage, FrameStats, Notice, ServerMessage};

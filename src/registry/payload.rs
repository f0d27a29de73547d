//! Serialized broadcast payloads

use bytes::Bytes;

use crate::frame::ServerMessage;

/// A JSON-encoded server message
///
/// Cheap to clone due to `Bytes` reference counting. The contents are
/// always valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(Bytes);

impl Payload {
    /// Serialize a message
    pub fn encode(message: &ServerMessage) -> Result<Self, serde_json::Error> {
        serde_json::to_vec(message).map(|buf| Self(Bytes::from(buf)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse the payload back into a JSON value
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.0)
    }
}

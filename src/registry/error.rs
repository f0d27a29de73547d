//! Delivery error types

use thiserror::Error;

/// Why a payload could not be handed to a subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The subscriber's connection has gone away
    #[error("subscriber queue closed")]
    Closed,
    /// The subscriber is not keeping up
    #[error("subscriber queue full")]
    Full,
}

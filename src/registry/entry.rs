//! Subscriber handles
//!
//! This module defines the per-subscriber state stored in the registry.

use std::time::{Duration, Instant};

use tokio::sync::mpsc::{self, error::TrySendError};

use super::error::DeliveryError;
use super::payload::Payload;

/// Unique identifier for a subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub u64);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Registry-side end of one subscriber's delivery queue
#[derive(Debug)]
pub struct Subscriber {
    tx: mpsc::Sender<Payload>,

    /// Payloads accepted into the queue
    pub delivered: u64,

    joined_at: Instant,
}

impl Subscriber {
    pub(super) fn new(tx: mpsc::Sender<Payload>) -> Self {
        Self {
            tx,
            delivered: 0,
            joined_at: Instant::now(),
        }
    }

    /// Time since the subscriber joined
    pub fn connected_for(&self) -> Duration {
        self.joined_at.elapsed()
    }

    /// Queue a payload without waiting
    pub(super) fn deliver(&mut self, payload: Payload) -> Result<(), DeliveryError> {
        match self.tx.try_send(payload) {
            Ok(()) => {
                self.delivered += 1;
                Ok(())
            }
            Err(TrySendError::Closed(_)) => Err(DeliveryError::Closed),
            Err(TrySendError::Full(_)) => Err(DeliveryError::Full),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ServerMessage;

    #[test]
    fn test_deliver_counts_and_reports_full() {
        let (tx, mut rx) = mpsc::channel(1);
        let mut sub = Subscriber::new(tx);
        let payload = Payload::encode(&ServerMessage::switched("stocks")).unwrap();

        assert_eq!(sub.deliver(payload.clone()), Ok(()));
        assert_eq!(sub.deliver(payload.clone()), Err(DeliveryError::Full));
        assert_eq!(sub.delivered, 1);

        rx.close();
        while rx.try_recv().is_ok() {}
        assert_eq!(sub.deliver(payload), Err(DeliveryError::Closed));
    }

    #[test]
    fn test_connected_for_tracks_join_time() {
        let (tx, _rx) = mpsc::channel(1);
        let sub = Subscriber::new(tx);
        std::thread::sleep(Duration::from_millis(5));
        assert!(sub.connected_for() >= Duration::from_millis(5));
    }
}

//! Subscriber registry for frame fan-out
//!
//! The registry tracks connected observers and delivers each broadcast to
//! all of them. Every subscriber owns a bounded queue drained by its
//! connection's writer; the registry only ever does a non-blocking push.
//!
//! # Architecture
//!
//! ```text
//!                      SubscriberRegistry
//!               ┌──────────────────────────────┐
//!               │ subscribers: RwLock<HashMap< │
//!               │   SubscriberId, Subscriber { │
//!               │     tx: mpsc::Sender,        │
//!               │   }                          │
//!               │ >>                           │
//!               └──────────────┬───────────────┘
//!                              │ broadcast(): serialize once,
//!                              │ try_send to each, evict failures
//!         ┌────────────────────┼────────────────────┐
//!         ▼                    ▼                    ▼
//!    rx.recv() → WS       rx.recv() → WS       (closed → evicted)
//! ```
//!
//! # Zero-Copy Design
//!
//! A message is serialized once into a [`Payload`], which wraps
//! `bytes::Bytes`. Each queue holds a reference-counted clone of the same
//! buffer.

pub mod entry;
pub mod error;
pub mod payload;
pub mod store;

pub use entry::{Subscriber, SubscriberId};
pub use error::DeliveryError;
pub use payload::Payload;
pub use store::SubscriberRegistry;

//! Broadcast coordination
//!
//! The coordinator owns the active source selection, runs the single
//! estimation pipeline and fans its frames out through the registry.
//!
//! # Restart on switch
//!
//! ```text
//!   switch("weather")
//!        │  selection.write(): source = weather, epoch += 1
//!        │  epoch_tx.send(epoch)  ──────────────┐
//!        │  broadcast("switched to weather")    │ wakes
//!        ▼                                      ▼
//!   [old run] epoch mismatch at next sample or tick wait ─► feed dropped
//!   [new run] reads selection ─► new feed + fresh estimator
//! ```
//!
//! Frames of one run reach every subscriber in computation order. Across a
//! switch the ordering is relaxed: a frame the old run had already computed
//! may land after the switch notice.

pub mod config;
pub mod core;
pub mod selection;

pub use self::config::CoordinatorConfig;
pub use self::core::BroadcastCoordinator;
pub use self::selection::{PipelineState, Selection, SwitchOutcome};

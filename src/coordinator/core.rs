//! BroadcastCoordinator implementation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, watch, RwLock};
use tokio::task::JoinHandle;

use crate::entropy::EntropyEstimator;
use crate::error::ConfigError;
use crate::frame::{ClientMessage, Frame, FrameStats, ServerMessage};
use crate::registry::{Payload, SubscriberId, SubscriberRegistry};
use crate::source::{SourceFeed, SourceKind};
use crate::stats::{PipelineCounters, ServerStats};

use super::config::CoordinatorConfig;
use super::selection::{PipelineState, Selection, SwitchOutcome};

/// How a pipeline run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunEnd {
    /// A newer selection replaced this run
    Superseded,
    /// The coordinator can no longer signal switches
    Stopped,
}

/// Owns the source selection, the pipeline and the subscriber set
///
/// Lock order: `selection` before the registry's lock. Nothing takes the
/// selection lock while holding the registry lock.
pub struct BroadcastCoordinator {
    config: CoordinatorConfig,

    /// Active source; written only by `switch`
    selection: RwLock<Selection>,

    /// Mirror of `selection.epoch`, read by the pipeline on every sample
    epoch_tx: watch::Sender<u64>,

    registry: SubscriberRegistry,

    running: AtomicBool,

    counters: PipelineCounters,
}

impl BroadcastCoordinator {
    /// Create a coordinator with default configuration
    pub fn new() -> Self {
        Self::build(CoordinatorConfig::default(), SubscriberRegistry::new())
    }

    /// Create a coordinator, validating `config`
    pub fn with_config(config: CoordinatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let registry = SubscriberRegistry::with_queue_capacity(config.queue_capacity)?;
        Ok(Self::build(config, registry))
    }

    fn build(config: CoordinatorConfig, registry: SubscriberRegistry) -> Self {
        let selection = Selection::new(config.default_source);
        let (epoch_tx, _) = watch::channel(selection.epoch);

        Self {
            config,
            selection: RwLock::new(selection),
            epoch_tx,
            registry,
            running: AtomicBool::new(false),
            counters: PipelineCounters::default(),
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &SubscriberRegistry {
        &self.registry
    }

    /// Current selection
    pub async fn selection(&self) -> Selection {
        *self.selection.read().await
    }

    /// Current selection epoch
    pub fn epoch(&self) -> u64 {
        *self.epoch_tx.borrow()
    }

    /// Pipeline lifecycle state
    pub async fn state(&self) -> PipelineState {
        if !self.running.load(Ordering::Acquire) {
            return PipelineState::Idle;
        }
        let Selection { source, epoch } = self.selection().await;
        PipelineState::Running { epoch, source }
    }

    /// Register a subscriber and greet it with the current selection
    pub async fn join(&self) -> (SubscriberId, mpsc::Receiver<Payload>) {
        // Holding the selection lock keeps the greeting and any later
        // switch notice in order.
        let selection = self.selection.read().await;
        let greeting = ServerMessage::greeting(selection.source.name(), SourceKind::names());
        self.registry.join(&greeting).await
    }

    /// Remove a subscriber; no-op if it is already gone
    pub async fn leave(&self, id: SubscriberId) {
        self.registry.leave(id).await;
    }

    /// Select a source by name
    ///
    /// Unknown names select the default source. The epoch only moves if
    /// the source actually changes, but every request is confirmed to all
    /// subscribers.
    pub async fn switch(&self, name: &str) -> SwitchOutcome {
        let mut selection = self.selection.write().await;

        let source = SourceKind::resolve(name, self.config.default_source);
        let changed = selection.select(source);

        if changed {
            self.epoch_tx.send_replace(selection.epoch);
            tracing::info!(
                source = %source,
                requested = name,
                epoch = selection.epoch,
                "Source switched"
            );
        } else {
            tracing::debug!(source = %source, requested = name, "Source unchanged");
        }

        self.registry
            .broadcast(&ServerMessage::switched(source.name()))
            .await;

        SwitchOutcome {
            source,
            epoch: selection.epoch,
            changed,
        }
    }

    /// Handle a text message from a subscriber
    ///
    /// Malformed or unrecognized messages are logged and dropped.
    pub async fn handle_client_text(&self, text: &str) -> Option<SwitchOutcome> {
        match ClientMessage::parse(text) {
            Ok(ClientMessage::Switch { source }) => {
                let name = source.as_deref().unwrap_or(self.config.default_source.name());
                Some(self.switch(name).await)
            }
            Err(e) => {
                tracing::debug!(error = %e, len = text.len(), "Ignoring client message");
                None
            }
        }
    }

    /// Statistics snapshot
    pub async fn stats(&self) -> ServerStats {
        let Selection { source, epoch } = self.selection().await;
        ServerStats {
            source: source.name().to_string(),
            epoch,
            pipeline: self.counters.snapshot(),
            registry: self.registry.stats().await,
        }
    }

    /// Spawn the pipeline on a background task
    ///
    /// Returns a handle that can be used to abort the task.
    pub fn spawn_pipeline(self: &Arc<Self>) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move { coordinator.run().await })
    }

    /// Run the pipeline, restarting it on every switch
    ///
    /// Only returns if switches can no longer be signalled.
    pub async fn run(&self) {
        let _running = RunningGuard::enter(&self.running);
        let mut epoch_rx = self.epoch_tx.subscribe();

        loop {
            let selection = self.selection().await;
            let _ = epoch_rx.borrow_and_update();

            if self.run_selection(selection, &mut epoch_rx).await == RunEnd::Stopped {
                tracing::warn!("Pipeline stopped");
                return;
            }
        }
    }

    /// Sample one source until its selection is superseded
    async fn run_selection(
        &self,
        Selection { source, epoch }: Selection,
        epoch_rx: &mut watch::Receiver<u64>,
    ) -> RunEnd {
        let config = self.config.estimator_for(source);
        let mut estimator = match EntropyEstimator::new(config) {
            Ok(estimator) => estimator,
            Err(e) => {
                // Parameters are validated at construction
                tracing::error!(source = %source, error = %e, "Invalid estimator parameters");
                return RunEnd::Stopped;
            }
        };
        let stats = FrameStats::from_config(&config);
        let mut feed = SourceFeed::open(source);

        self.counters.runs.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            source = %source,
            epoch = epoch,
            dt = feed.dt(),
            rate_hz = stats.rate_hz,
            warmup = estimator.warmup_threshold(),
            "Pipeline run started"
        );

        let end = loop {
            if *epoch_rx.borrow() != epoch {
                break RunEnd::Superseded;
            }

            let sample = tokio::select! {
                biased;
                changed = epoch_rx.changed() => {
                    if changed.is_err() {
                        break RunEnd::Stopped;
                    }
                    continue;
                }
                sample = feed.next() => sample,
            };

            if *epoch_rx.borrow() != epoch {
                break RunEnd::Superseded;
            }

            self.counters.samples.fetch_add(1, Ordering::Relaxed);
            let Some(state) = estimator.step(sample.value) else {
                self.counters.warmup_skipped.fetch_add(1, Ordering::Relaxed);
                continue;
            };

            let frame = Frame::build(state, source.name());
            self.registry
                .broadcast(&ServerMessage::frame(frame, stats))
                .await;
            self.counters.frames.fetch_add(1, Ordering::Relaxed);
        };

        tracing::debug!(
            source = %source,
            epoch = epoch,
            samples = feed.produced(),
            "Pipeline run ended, releasing feed"
        );
        drop(feed);

        end
    }
}

impl Default for BroadcastCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Marks the pipeline as running for as long as it lives
struct RunningGuard<'a>(&'a AtomicBool);

impl<'a> RunningGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

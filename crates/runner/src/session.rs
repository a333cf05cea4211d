use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crossrate_conversion::{RateComputer, SnapshotStore};
use crossrate_core::{OrderBookSnapshot, PairId};
use crossrate_gateway::{SnapshotCallback, StreamConfig, StreamState, StreamStats, StreamSupervisor};
use crossrate_ports::{Clock, SnapshotReader};

/// Observation handles for one running supervisor
struct SupervisorHandle {
    state: watch::Receiver<StreamState>,
    stats: Arc<StreamStats>,
}

/// One streaming run: the shared snapshot store, the root cancellation
/// token and a supervisor task per pair.
///
/// The store lives exactly as long as the session. Supervisors get write
/// access; everything else gets the read-only view from [`reader`].
///
/// [`reader`]: StreamingSession::reader
pub struct StreamingSession {
    config: StreamConfig,
    clock: Arc<dyn Clock>,
    store: Arc<SnapshotStore>,
    cancel: CancellationToken,
    tasks: JoinSet<()>,
    supervisors: BTreeMap<PairId, SupervisorHandle>,
}

impl StreamingSession {
    pub fn new(config: StreamConfig, clock: Arc<dyn Clock>) -> Self {
        StreamingSession {
            config,
            clock,
            store: Arc::new(SnapshotStore::new()),
            cancel: CancellationToken::new(),
            tasks: JoinSet::new(),
            supervisors: BTreeMap::new(),
        }
    }

    /// Read-only view of the latest snapshots
    pub fn reader(&self) -> Arc<dyn SnapshotReader> {
        self.store.clone()
    }

    pub fn snapshot_count(&self) -> usize {
        self.store.len()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Spawn a supervisor for each pair. Must be called inside a tokio runtime.
    pub fn start(&mut self, pairs: &[PairId], on_snapshot: Option<SnapshotCallback>) {
        for pair in pairs {
            self.spawn(pair.clone(), on_snapshot.clone());
        }
        tracing::info!(count = self.supervisors.len(), "Streaming session started");
    }

    /// Spawn one supervisor; a pair that is already streamed is skipped.
    pub fn spawn(&mut self, pair: PairId, on_snapshot: Option<SnapshotCallback>) -> bool {
        if self.supervisors.contains_key(&pair) {
            tracing::warn!(pair = %pair, "Pair already streamed, skipping");
            return false;
        }

        let mut supervisor = StreamSupervisor::new(
            pair.clone(),
            self.config.clone(),
            self.store.clone(),
            Arc::clone(&self.clock),
        );
        if let Some(callback) = on_snapshot {
            supervisor = supervisor.with_callback(callback);
        }

        self.supervisors.insert(
            pair,
            SupervisorHandle {
                state: supervisor.state(),
                stats: supervisor.stats(),
            },
        );
        self.tasks.spawn(supervisor.run(self.cancel.clone()));
        true
    }

    pub fn pairs(&self) -> Vec<PairId> {
        self.supervisors.keys().cloned().collect()
    }

    /// Current state of every supervisor, ordered by pair
    pub fn states(&self) -> Vec<(PairId, StreamState)> {
        self.supervisors
            .iter()
            .map(|(pair, handle)| (pair.clone(), handle.state.borrow().clone()))
            .collect()
    }

    pub fn stats(&self, pair: &PairId) -> Option<Arc<StreamStats>> {
        self.supervisors.get(pair).map(|h| Arc::clone(&h.stats))
    }

    /// Cancel every supervisor and wait for them to stop.
    ///
    /// Tasks still running after `grace` are aborted.
    pub async fn shutdown(mut self, grace: Duration) {
        tracing::info!(count = self.supervisors.len(), "Stopping streaming session");
        self.cancel.cancel();

        let drained = tokio::time::timeout(grace, async {
            while let Some(result) = self.tasks.join_next().await {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "Supervisor task ended abnormally");
                }
            }
        })
        .await;

        if drained.is_err() {
            tracing::warn!(remaining = self.tasks.len(), "Aborting supervisors after grace period");
            self.tasks.shutdown().await;
        }

        tracing::info!("Streaming session stopped");
    }
}

/// Snapshot callback running one rate computation cycle per accepted snapshot.
///
/// The cycle appends to the sink synchronously on the supervisor's task. On a
/// multi-threaded runtime it runs inside `block_in_place` so a slow write does
/// not stall the other tasks queued on that worker.
pub fn rate_callback(computer: Arc<RateComputer>) -> SnapshotCallback {
    Arc::new(move |snapshot: &OrderBookSnapshot| {
        let multi_thread = Handle::try_current()
            .map(|handle| handle.runtime_flavor() == RuntimeFlavor::MultiThread)
            .unwrap_or(false);

        if multi_thread {
            tokio::task::block_in_place(|| {
                computer.on_snapshot_update(&snapshot.pair);
            });
        } else {
            computer.on_snapshot_update(&snapshot.pair);
        }
    })
}

//! Auto-advance driver and serving-layer handle
//!
//! [`SimulatorHandle`] is the shared, synchronized entry point a serving layer
//! holds. A single reader/writer lock guards the engine: `snapshot` takes the
//! read side, `advance_slot` and `reset` the write side.
//!
//! Auto-advance runs as a tokio task that calls `advance_slot(None)` on a
//! fixed interval until its cancellation token fires. Cancellation is only
//! observed between slots; a slot in progress always completes.

use crate::orchestrator::engine::{SimulationEngine, SnapshotObserver};
use crate::orchestrator::snapshot::Snapshot;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Snapshots buffered per subscriber before the slowest one starts lagging
const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Errors from controlling the auto-advance driver
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DriverError {
    #[error("auto-advance requires a running tokio runtime")]
    NoRuntime,

    #[error("auto-advance interval must be non-zero")]
    InvalidInterval,
}

/// Forwards snapshots to a tokio broadcast channel
///
/// Sending never blocks; with no live receivers the snapshot is dropped.
#[derive(Debug, Clone)]
pub struct BroadcastObserver {
    sender: broadcast::Sender<Snapshot>,
}

impl BroadcastObserver {
    pub fn new(sender: broadcast::Sender<Snapshot>) -> Self {
        Self { sender }
    }
}

impl SnapshotObserver for BroadcastObserver {
    fn notify(&self, snapshot: &Snapshot) {
        // Err only means nobody is subscribed
        let _ = self.sender.send(snapshot.clone());
    }
}

struct AutoTask {
    cancel: CancellationToken,
    _task: JoinHandle<()>,
}

/// Cloneable, thread-safe handle to a shared engine
///
/// # Example
///
/// ```rust
/// use network_simulator_core_rs::{SimulationEngine, SimulatorConfig, SimulatorHandle};
///
/// let engine = SimulationEngine::new(SimulatorConfig::default()).unwrap();
/// let handle = SimulatorHandle::new(engine);
/// let mut updates = handle.subscribe();
///
/// let snapshot = handle.advance_slot(None);
/// assert_eq!(updates.try_recv().unwrap(), snapshot);
/// assert!(!handle.is_running());
/// ```
#[derive(Clone)]
pub struct SimulatorHandle {
    engine: Arc<RwLock<SimulationEngine>>,
    updates: broadcast::Sender<Snapshot>,
    auto: Arc<Mutex<Option<AutoTask>>>,
}

impl SimulatorHandle {
    /// Take ownership of `engine` and attach a broadcast observer to it
    pub fn new(mut engine: SimulationEngine) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        engine.add_observer(Arc::new(BroadcastObserver::new(updates.clone())));

        Self {
            engine: Arc::new(RwLock::new(engine)),
            updates,
            auto: Arc::new(Mutex::new(None)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SimulationEngine> {
        self.engine.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SimulationEngine> {
        self.engine.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Simulate one slot (see [`SimulationEngine::advance_slot`])
    pub fn advance_slot(&self, slot: Option<&str>) -> Snapshot {
        self.write().advance_slot(slot)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.read().snapshot()
    }

    /// Stop auto-advance, then reinitialize the engine
    pub fn reset(&self) -> Snapshot {
        self.stop_auto();
        self.write().reset()
    }

    /// Receive every snapshot published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.updates.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.read().is_auto_running()
    }

    /// Run an operation with shared access to the engine
    pub fn with_engine<R>(&self, f: impl FnOnce(&SimulationEngine) -> R) -> R {
        f(&self.read())
    }

    /// Start advancing one slot per `interval` on the current tokio runtime
    ///
    /// The first slot is advanced immediately. Returns `Ok(false)` if
    /// auto-advance was already running.
    pub fn start_auto(&self, interval: Duration) -> Result<bool, DriverError> {
        if interval.is_zero() {
            return Err(DriverError::InvalidInterval);
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| DriverError::NoRuntime)?;

        let mut auto = self.auto.lock().unwrap_or_else(PoisonError::into_inner);
        if auto.is_some() {
            return Ok(false);
        }

        self.write().set_auto_running(true);

        let cancel = CancellationToken::new();
        let task = runtime.spawn(run_auto_advance(
            Arc::downgrade(&self.engine),
            interval,
            cancel.clone(),
        ));
        *auto = Some(AutoTask { cancel, _task: task });

        info!(interval_ms = interval.as_millis() as u64, "auto-advance started");
        Ok(true)
    }

    /// Stop auto-advance; returns `false` if it was not running
    ///
    /// Once this returns no further slot is advanced by the driver.
    pub fn stop_auto(&self) -> bool {
        let task = self
            .auto
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(task) = task else {
            return false;
        };

        self.write().set_auto_running(false);
        task.cancel.cancel();

        info!("auto-advance stopped");
        true
    }
}

impl std::fmt::Debug for SimulatorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatorHandle")
            .field("engine", &*self.read())
            .field("subscribers", &self.updates.receiver_count())
            .finish()
    }
}

async fn run_auto_advance(
    engine: Weak<RwLock<SimulationEngine>>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if !advance_if_running(&engine, &cancel) {
                    break;
                }
            }
        }
    }

    debug!("auto-advance loop exited");
}

/// Advance one slot while this task is live; false ends the loop
///
/// Both checks happen under the write lock, so a task cancelled by
/// `stop_auto` never advances after a newer task has set the flag again.
fn advance_if_running(engine: &Weak<RwLock<SimulationEngine>>, cancel: &CancellationToken) -> bool {
    let Some(engine) = engine.upgrade() else {
        return false;
    };
    let mut engine = engine.write().unwrap_or_else(PoisonError::into_inner);

    if cancel.is_cancelled() || !engine.is_auto_running() {
        return false;
    }
    engine.advance_slot(None);
    true
}

// ============================================================================
// Tests
// ============================================================================

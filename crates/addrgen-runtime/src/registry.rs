//! In-memory registry of generation processes.
//!
//! The registry owns the authoritative `ProcessRecord` for every launched
//! job, the per-process broadcast channel that feeds stream subscribers, and
//! the control handle used to signal the live OS process.
//!
//! All state sits behind one `RwLock`. Events are broadcast while the write
//! lock is held, so a subscriber that snapshots the status and subscribes
//! under the read lock never misses or double-counts an event.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use addrgen_core::{
    ExitOutcome, GenerationError, ProcessEvent, ProcessId, ProcessRecord, ProcessStatus,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

/// Command sent to the task that owns a process's `Child`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Graceful termination (SIGTERM on unix, forced kill elsewhere).
    Terminate,
    /// Forceful termination (SIGKILL on unix).
    Kill,
}

/// Handle used to signal a live process.
///
/// The `Child` itself stays with the lifecycle tracker, which is the only
/// place that signals it. The tracker stops serving commands once the child
/// has been reaped, so a recycled pid is never signalled.
#[derive(Debug, Clone)]
pub struct ProcessControl {
    commands: mpsc::UnboundedSender<ControlCommand>,
}

impl ProcessControl {
    pub const fn new(commands: mpsc::UnboundedSender<ControlCommand>) -> Self {
        Self { commands }
    }

    /// Ask the tracker for a graceful stop. Returns `false` if the tracker is gone.
    pub fn terminate(&self) -> bool {
        self.commands.send(ControlCommand::Terminate).is_ok()
    }

    /// Ask the tracker to kill the process. Returns `false` if the tracker is gone.
    pub fn kill(&self) -> bool {
        self.commands.send(ControlCommand::Kill).is_ok()
    }
}

/// Which output stream a chunk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Stdout,
    Stderr,
}

impl OutputKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// What a new stream subscriber starts from.
#[derive(Debug)]
pub struct Subscription {
    pub status: ProcessStatus,
    pub error: Option<String>,
    pub outcome: ExitOutcome,
    /// `None` once the process has exited or never started.
    pub receiver: Option<broadcast::Receiver<ProcessEvent>>,
}

struct TrackedProcess {
    record: ProcessRecord,
    events: broadcast::Sender<ProcessEvent>,
    /// Held until the tracker has drained the output and published the exit.
    control: Option<ProcessControl>,
    /// The OS process has been reaped.
    exited: bool,
}

impl TrackedProcess {
    fn publish(&self, event: ProcessEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

#[derive(Default)]
struct Inner {
    processes: HashMap<ProcessId, TrackedProcess>,
    /// Insertion order, oldest first. Drives eviction.
    order: VecDeque<ProcessId>,
}

/// Registry of generation processes.
///
/// Retains at most `max_retained` records. When an insert goes over the cap
/// the oldest terminal records are evicted; running records are never evicted,
/// so the cap can be exceeded while many jobs are live.
pub struct ProcessRegistry {
    inner: RwLock<Inner>,
    seq: AtomicU64,
    max_retained: usize,
    event_capacity: usize,
}

impl ProcessRegistry {
    pub fn new(max_retained: usize, event_capacity: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            seq: AtomicU64::new(0),
            max_retained: max_retained.max(1),
            event_capacity: event_capacity.max(1),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Allocate a fresh, never reused process id.
    pub fn next_id(&self, country_code: &str, now: DateTime<Utc>) -> ProcessId {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        ProcessId::compose(country_code, now, seq)
    }

    /// Track a new record.
    ///
    /// `control` is `None` when there is no live process behind the record.
    pub fn insert(&self, record: ProcessRecord, control: Option<ProcessControl>) {
        let (events, _) = broadcast::channel(self.event_capacity);
        let id = record.process_id.clone();

        let mut inner = self.write();
        inner.order.push_back(id.clone());
        inner.processes.insert(
            id,
            TrackedProcess {
                record,
                events,
                control,
                exited: false,
            },
        );
        self.evict(&mut inner);
    }

    fn evict(&self, inner: &mut Inner) {
        while inner.processes.len() > self.max_retained {
            let Some(pos) = inner.order.iter().position(|id| {
                inner
                    .processes
                    .get(id)
                    .is_some_and(|p| p.record.status.is_terminal() && p.control.is_none())
            }) else {
                break;
            };
            if let Some(id) = inner.order.remove(pos) {
                inner.processes.remove(&id);
                debug!(process_id = %id, "Evicted finished process record");
            }
        }
    }

    pub fn get(&self, id: &ProcessId) -> Option<ProcessRecord> {
        self.read().processes.get(id).map(|p| p.record.clone())
    }

    /// Snapshot of every tracked record, in insertion order.
    pub fn list(&self) -> Vec<ProcessRecord> {
        let inner = self.read();
        inner
            .order
            .iter()
            .filter_map(|id| inner.processes.get(id))
            .map(|p| p.record.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the OS process behind `id` has not been observed to exit yet.
    pub fn is_live(&self, id: &ProcessId) -> bool {
        self.read()
            .processes
            .get(id)
            .is_some_and(|p| p.control.is_some() && !p.exited)
    }

    /// Capture one output chunk.
    ///
    /// Stdout is appended to the record's buffer whether or not anyone is
    /// watching; both streams are forwarded to live subscribers.
    pub fn record_output(&self, id: &ProcessId, kind: OutputKind, chunk: String) {
        let mut inner = self.write();
        let Some(process) = inner.processes.get_mut(id) else {
            return;
        };
        let event = match kind {
            OutputKind::Stdout => {
                process.record.output_so_far.push(chunk.clone());
                ProcessEvent::Stdout(chunk)
            }
            OutputKind::Stderr => ProcessEvent::Stderr(chunk),
        };
        process.publish(event);
    }

    /// The OS process exited. Records the exit fields and settles the status
    /// right away, while output may still be draining.
    ///
    /// The status only changes if the record is still `running`; a record
    /// that was cancelled first stays `cancelled`. Returns the final status.
    pub fn record_exit(&self, id: &ProcessId, outcome: ExitOutcome) -> Option<ProcessStatus> {
        let mut inner = self.write();
        let process = inner.processes.get_mut(id)?;

        // An exit is observed once; repeats change nothing.
        if process.exited || process.control.is_none() {
            debug!(process_id = %id, "Ignoring repeated exit");
            return Some(process.record.status);
        }
        process.exited = true;

        process.record.record_exit(outcome);
        if process.record.finish(outcome.natural_status(), Utc::now()) {
            info!(
                process_id = %id,
                code = ?outcome.code,
                signal = ?outcome.signal,
                status = %process.record.status,
                "Generator exited"
            );
        } else {
            debug!(
                process_id = %id,
                status = %process.record.status,
                "Generator exited after reaching a terminal status"
            );
        }

        Some(process.record.status)
    }

    /// All output has been captured. Releases the control handle and
    /// broadcasts the final event, which ends every open stream.
    pub fn finish(&self, id: &ProcessId) {
        let mut inner = self.write();
        let Some(process) = inner.processes.get_mut(id) else {
            return;
        };
        if process.control.take().is_some() {
            process.publish(ProcessEvent::Exited(process.record.exit_outcome()));
        }
    }

    /// Waiting on the process failed.
    ///
    /// Moves a running record to `error`, keeps the message and ends open
    /// streams.
    pub fn fail(&self, id: &ProcessId, message: String) -> Option<ProcessStatus> {
        let mut inner = self.write();
        let process = inner.processes.get_mut(id)?;

        let released = process.control.take().is_some();
        let changed = process.record.fail(message.clone(), Utc::now());
        if changed || released {
            process.publish(ProcessEvent::Stderr(message));
            process.publish(ProcessEvent::Exited(process.record.exit_outcome()));
        }

        Some(process.record.status)
    }

    /// Flip a running record to `cancelled` and stamp its end time.
    ///
    /// Returns the control handle if the tracker is still attached, so the
    /// caller can deliver the signals.
    pub fn mark_cancelled(
        &self,
        id: &ProcessId,
    ) -> Result<Option<ProcessControl>, GenerationError> {
        let mut inner = self.write();
        let process = inner
            .processes
            .get_mut(id)
            .ok_or_else(|| GenerationError::NotFound(id.clone()))?;

        if !process.record.finish(ProcessStatus::Cancelled, Utc::now()) {
            return Err(GenerationError::NotRunning {
                id: id.clone(),
                status: process.record.status,
            });
        }

        Ok(process.control.clone())
    }

    /// Snapshot the status and subscribe to live events in one step.
    pub fn subscribe(&self, id: &ProcessId) -> Option<Subscription> {
        let inner = self.read();
        let process = inner.processes.get(id)?;

        Some(Subscription {
            status: process.record.status,
            error: process.record.error.clone(),
            outcome: process.record.exit_outcome(),
            receiver: process
                .control
                .as_ref()
                .map(|_| process.events.subscribe()),
        })
    }

    /// Number of live subscribers for a process.
    pub fn subscriber_count(&self, id: &ProcessId) -> usize {
        self.read()
            .processes
            .get(id)
            .map_or(0, |p| p.events.receiver_count())
    }
}

impl Default for ProcessRegistry {
    fn default() -> Self {
        Self::new(
            addrgen_core::DEFAULT_MAX_RETAINED,
            addrgen_core::DEFAULT_EVENT_CAPACITY,
        )
    }
}

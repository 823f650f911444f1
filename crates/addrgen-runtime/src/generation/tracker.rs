//! Lifecycle tracker: owns the `Child` until it exits.
//!
//! One task per process waits for the exit and serves signal requests from
//! the cancellation controller. The exit is recorded the moment the child is
//! reaped; the readers are drained afterwards and only then is the final
//! event published, so `complete` is always the last thing a stream sees.

use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Duration;

use addrgen_core::{ExitOutcome, ProcessId};
use futures_util::future::join_all;
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

use crate::registry::{ControlCommand, ProcessRegistry};

/// Upper bound on waiting for stdout/stderr EOF after the process exited.
///
/// A grandchild that inherited the pipes can keep them open; completion is
/// not held hostage to it.
const READER_DRAIN_TIMEOUT: Duration = Duration::from_secs(3);

pub(crate) fn spawn_tracker(
    registry: Arc<ProcessRegistry>,
    process_id: ProcessId,
    mut child: Child,
    mut commands: mpsc::UnboundedReceiver<ControlCommand>,
    readers: Vec<JoinHandle<()>>,
) {
    tokio::spawn(async move {
        let mut commands_open = true;

        let waited = loop {
            tokio::select! {
                status = child.wait() => break status,
                cmd = commands.recv(), if commands_open => match cmd {
                    Some(ControlCommand::Terminate) => terminate(&mut child, &process_id),
                    Some(ControlCommand::Kill) => kill(&mut child, &process_id),
                    None => commands_open = false,
                },
            }
        };
        // Reaped: no signal is sent past this point.
        drop(commands);

        if let Ok(status) = &waited {
            registry.record_exit(&process_id, exit_outcome(*status));
        }

        if timeout(READER_DRAIN_TIMEOUT, join_all(readers)).await.is_err() {
            warn!(process_id = %process_id, "Output readers still open after exit");
        }

        match waited {
            Ok(_) => registry.finish(&process_id),
            Err(e) => {
                warn!(process_id = %process_id, error = %e, "Waiting on generator failed");
                registry.fail(&process_id, format!("Failed to wait for generator: {e}"));
            }
        }
    });
}

/// Graceful stop, falling back to a kill when SIGTERM cannot be delivered.
fn terminate(child: &mut Child, process_id: &ProcessId) {
    if !send_sigterm(child, process_id) {
        kill(child, process_id);
    }
}

fn kill(child: &mut Child, process_id: &ProcessId) {
    debug!(process_id = %process_id, "Sending SIGKILL");
    if let Err(e) = child.start_kill() {
        // Already exited; the wait branch picks it up.
        debug!(process_id = %process_id, error = %e, "Kill failed");
    }
}

/// Returns `false` when the signal could not be delivered.
#[cfg(unix)]
fn send_sigterm(child: &Child, process_id: &ProcessId) -> bool {
    // `id()` is `None` once the child has been reaped.
    let Some(pid) = child.id().and_then(|p| i32::try_from(p).ok()) else {
        return false;
    };

    match signal::kill(Pid::from_raw(pid), Signal::SIGTERM) {
        Ok(()) => {
            debug!(process_id = %process_id, pid, "Sent SIGTERM");
            true
        }
        Err(e) => {
            debug!(process_id = %process_id, pid, error = %e, "SIGTERM failed");
            false
        }
    }
}

#[cfg(not(unix))]
fn send_sigterm(_child: &Child, _process_id: &ProcessId) -> bool {
    false
}

pub(crate) fn exit_outcome(status: ExitStatus) -> ExitOutcome {
    ExitOutcome {
        code: status.code(),
        signal: exit_signal(status),
    }
}

#[cfg(unix)]
fn exit_signal(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: ExitStatus) -> Option<i32> {
    None
}

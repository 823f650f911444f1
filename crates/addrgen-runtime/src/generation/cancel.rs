//! Cancellation with SIGTERM → SIGKILL escalation.
//!
//! The record is flipped to `cancelled` *before* the OS confirms anything, so
//! once `cancel` returns no later exit can turn the job into `completed` or
//! `failed`. Do not replace the flip with a blocking wait for the process to
//! die.

use std::sync::Arc;
use std::time::Duration;

use addrgen_core::{GenerationError, ProcessId};
use tracing::{debug, info, warn};

use crate::registry::ProcessRegistry;

/// Cancel a running process.
///
/// # Strategy
/// 1. Mark the record `cancelled` and stamp its end time
/// 2. Ask the tracker for SIGTERM
/// 3. After `grace`, ask for SIGKILL if the process has not exited
///
/// Signals are delivered by the tracker that owns the `Child`, which kills
/// right away when SIGTERM cannot be sent. Signal failures never surface to
/// the caller.
///
/// # Platform behavior
/// - Unix: SIGTERM via nix, SIGKILL via `Child::start_kill`
/// - Windows: no graceful signal, the process is killed immediately
pub(crate) fn cancel(
    registry: &Arc<ProcessRegistry>,
    process_id: &ProcessId,
    grace: Duration,
) -> Result<(), GenerationError> {
    let control = registry.mark_cancelled(process_id)?;
    info!(process_id = %process_id, "Generation cancelled");

    let Some(control) = control else {
        // Never started or already gone; nothing to signal.
        return Ok(());
    };

    if !control.terminate() {
        debug!(process_id = %process_id, "Tracker already finished, SIGTERM skipped");
        return Ok(());
    }

    let registry = Arc::clone(registry);
    let process_id = process_id.clone();
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        if registry.is_live(&process_id) {
            warn!(
                process_id = %process_id,
                grace_ms = grace.as_millis(),
                "Generator ignored SIGTERM, escalating to SIGKILL"
            );
            if !control.kill() {
                debug!(process_id = %process_id, "Tracker already finished, kill skipped");
            }
        }
    });

    Ok(())
}

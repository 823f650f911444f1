//! Process launcher: spawns the generator and wires its observers.

use std::process::Stdio;
use std::sync::Arc;

use addrgen_core::{GeneratorSettings, ProcessId, ProcessRecord};
use chrono::Utc;
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::tracker::spawn_tracker;
use crate::output::spawn_output_reader;
use crate::registry::{OutputKind, ProcessControl, ProcessRegistry};

/// Validated launch parameters.
pub(crate) struct LaunchParams {
    pub country_code: String,
    pub country_name: String,
    pub count: u32,
}

/// Start the generator and return its id without waiting on it.
///
/// A spawn failure is not an error here: the record is inserted already in
/// `error`, so it shows up in listings and streams like any other job.
pub(crate) fn launch(
    registry: &Arc<ProcessRegistry>,
    settings: &GeneratorSettings,
    params: LaunchParams,
) -> ProcessId {
    let now = Utc::now();
    let process_id = registry.next_id(&params.country_code, now);
    let mut record = ProcessRecord::running(
        process_id.clone(),
        params.country_code,
        params.country_name.clone(),
        params.count,
        now,
    );

    match build_command(settings, &params.country_name, params.count).spawn() {
        Ok(child) => {
            info!(
                process_id = %process_id,
                country = %params.country_name,
                count = params.count,
                pid = ?child.id(),
                "Generator started"
            );
            attach(registry, process_id.clone(), record, child);
        }
        Err(e) => {
            warn!(
                process_id = %process_id,
                program = %settings.program.display(),
                error = %e,
                "Failed to spawn generator"
            );
            record.fail(format!("Failed to start generator: {e}"), Utc::now());
            registry.insert(record, None);
        }
    }

    process_id
}

fn build_command(settings: &GeneratorSettings, country_name: &str, count: u32) -> Command {
    let mut cmd = Command::new(&settings.program);
    cmd.args(&settings.args)
        .arg(country_name)
        .arg(count.to_string())
        .current_dir(&settings.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

/// Register the live process and attach stdout capture, stderr capture and
/// the exit tracker.
fn attach(
    registry: &Arc<ProcessRegistry>,
    process_id: ProcessId,
    record: ProcessRecord,
    mut child: Child,
) {
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    registry.insert(record, Some(ProcessControl::new(commands_tx)));

    let mut readers = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        readers.push(spawn_output_reader(
            stdout,
            Arc::clone(registry),
            process_id.clone(),
            OutputKind::Stdout,
        ));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(spawn_output_reader(
            stderr,
            Arc::clone(registry),
            process_id.clone(),
            OutputKind::Stderr,
        ));
    }

    spawn_tracker(Arc::clone(registry), process_id, child, commands_rx, readers);
}

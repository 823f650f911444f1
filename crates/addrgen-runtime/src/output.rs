//! Async output readers (non-UTF8-safe).
//!
//! The generator may print bytes that are not valid UTF-8 (addresses in
//! arbitrary scripts, partial writes on kill). `BufReader::lines()` would end
//! the reader on the first invalid sequence, so lines are read as bytes and
//! decoded lossily.

use std::sync::Arc;

use addrgen_core::ProcessId;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::registry::{OutputKind, ProcessRegistry};

/// Read `stream` line by line into the registry until EOF.
///
/// Returns the task handle so the lifecycle tracker can wait for the last
/// chunk before announcing completion.
pub(crate) fn spawn_output_reader(
    stream: impl AsyncRead + Unpin + Send + 'static,
    registry: Arc<ProcessRegistry>,
    process_id: ProcessId,
    kind: OutputKind,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf: Vec<u8> = Vec::with_capacity(1024);

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break, // EOF
                Ok(_) => {
                    // Trim trailing newline(s)
                    if buf.last() == Some(&b'\n') {
                        buf.pop();
                        if buf.last() == Some(&b'\r') {
                            buf.pop();
                        }
                    }

                    let line = String::from_utf8_lossy(&buf).into_owned();
                    debug!(process_id = %process_id, stream = kind.as_str(), "{}", line);
                    registry.record_output(&process_id, kind, line);
                }
                Err(e) => {
                    debug!(
                        process_id = %process_id,
                        stream = kind.as_str(),
                        error = %e,
                        "output reader exiting due to read error"
                    );
                    break;
                }
            }
        }

        debug!(process_id = %process_id, stream = kind.as_str(), "output reader task exiting");
    })
}

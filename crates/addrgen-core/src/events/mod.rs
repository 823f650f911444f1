//! Process output events.
//!
//! `ProcessEvent` is what the runtime broadcasts per process; `StreamEvent`
//! is the typed event a stream subscriber receives.

use serde::{Deserialize, Serialize};

use crate::domain::{ExitOutcome, ProcessStatus};

/// Raw event published on a process's broadcast channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    /// One stdout chunk.
    Stdout(String),
    /// One stderr chunk.
    Stderr(String),
    /// The process is gone. Always the last event on the channel.
    Exited(ExitOutcome),
}

/// Event delivered to a stream subscriber.
///
/// Serialized with a `type` tag, e.g. `{"type":"output","data":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    /// Current status, sent once when the stream opens.
    Status {
        status: ProcessStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Output {
        data: String,
    },
    Error {
        data: String,
    },
    /// The process ended. Always the last event of a stream.
    Complete {
        code: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        signal: Option<i32>,
    },
}

impl StreamEvent {
    #[must_use]
    pub const fn complete(outcome: ExitOutcome) -> Self {
        Self::Complete {
            code: outcome.code,
            signal: outcome.signal,
        }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }

    /// Map a broadcast event to the subscriber-facing shape.
    #[must_use]
    pub fn from_process_event(event: ProcessEvent) -> Self {
        match event {
            ProcessEvent::Stdout(data) => Self::Output { data },
            ProcessEvent::Stderr(data) => Self::Error { data },
            ProcessEvent::Exited(outcome) => Self::complete(outcome),
        }
    }
}

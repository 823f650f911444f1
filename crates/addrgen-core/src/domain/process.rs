//! Generation process domain types.
//!
//! A `ProcessRecord` is the tracked state of one launched generator job.
//! Records are pure data; the live OS handle is owned by the runtime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a generation job.
///
/// Built from the country code, the launch time in milliseconds and a
/// registry-wide sequence number, e.g. `US_1718000000000_3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(String);

impl ProcessId {
    /// Compose an id from its parts.
    #[must_use]
    pub fn compose(country_code: &str, started_at: DateTime<Utc>, seq: u64) -> Self {
        Self(format!(
            "{}_{}_{}",
            country_code,
            started_at.timestamp_millis(),
            seq
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ProcessId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ProcessId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of a generation job.
///
/// `Running` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    Running,
    Completed,
    Failed,
    Cancelled,
    Error,
}

impl ProcessStatus {
    /// Whether no further transition is permitted from this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an OS process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExitOutcome {
    /// Exit code, if the process exited on its own.
    pub code: Option<i32>,
    /// Terminating signal number (unix), if the process was killed.
    pub signal: Option<i32>,
}

impl ExitOutcome {
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Status a still-running record moves to when the process exits this way.
    #[must_use]
    pub const fn natural_status(&self) -> ProcessStatus {
        if self.success() {
            ProcessStatus::Completed
        } else {
            ProcessStatus::Failed
        }
    }
}

/// Tracked state of one generation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRecord {
    pub process_id: ProcessId,
    pub country_code: String,
    pub country_name: String,
    pub count: u32,
    pub status: ProcessStatus,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Stdout chunks captured so far, oldest first. Append-only.
    pub output_so_far: Vec<String>,
}

impl ProcessRecord {
    /// New record in the `running` state.
    #[must_use]
    pub fn running(
        process_id: ProcessId,
        country_code: String,
        country_name: String,
        count: u32,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            process_id,
            country_code,
            country_name,
            count,
            status: ProcessStatus::Running,
            start_time,
            end_time: None,
            exit_code: None,
            signal: None,
            error: None,
            output_so_far: Vec::new(),
        }
    }

    /// Move to a terminal status if still running.
    ///
    /// Returns `false` (and changes nothing) when the record is already
    /// terminal, which is what keeps `cancelled` from being overwritten by a
    /// late exit.
    pub fn finish(&mut self, status: ProcessStatus, at: DateTime<Utc>) -> bool {
        debug_assert!(status.is_terminal());
        if self.status.is_terminal() {
            return false;
        }
        self.status = status;
        self.end_time = Some(at);
        true
    }

    /// Move to `error` with a message if still running.
    pub fn fail(&mut self, message: String, at: DateTime<Utc>) -> bool {
        if !self.finish(ProcessStatus::Error, at) {
            return false;
        }
        self.error = Some(message);
        true
    }

    /// Record the OS exit fields. Status is left to [`Self::finish`].
    pub fn record_exit(&mut self, outcome: ExitOutcome) {
        self.exit_code = outcome.code;
        self.signal = outcome.signal;
    }

    pub fn exit_outcome(&self) -> ExitOutcome {
        ExitOutcome {
            code: self.exit_code,
            signal: self.signal,
        }
    }
}

//! Port definitions (trait abstractions) for external systems, plus the
//! domain error type adapters map from.
//!
//! # Design Rules
//!
//! - No process or filesystem implementation details in signatures
//! - Adapters translate `GenerationError` into their own error shapes

pub mod country_directory;

use thiserror::Error;

use crate::domain::{ProcessId, ProcessStatus};

pub use country_directory::{CountryDirectoryPort, StaticCountryDirectory};

/// Domain error for the generation operations.
///
/// Spawn failures have no variant: a launch that fails to start the
/// generator still succeeds, and the failure is recorded on the process.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The caller sent an invalid request. Nothing was created.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No process with this id is tracked.
    #[error("Process not found: {0}")]
    NotFound(ProcessId),

    /// The process exists but is no longer running.
    #[error("Process {id} is already {status}")]
    NotRunning { id: ProcessId, status: ProcessStatus },

    /// The country directory could not be read.
    #[error("Country directory error: {0}")]
    Directory(String),

    /// Internal error (unexpected condition).
    #[error("Internal error: {0}")]
    Internal(String),
}

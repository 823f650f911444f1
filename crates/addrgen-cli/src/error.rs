//! CLI-specific error types and exit codes.

use addrgen_core::SettingsError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid settings from flags or environment.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// The web server failed to start or stopped with an error.
    #[error("Server error: {0}")]
    Server(String),

    /// Domain operation failed.
    #[error("{0}")]
    Generation(String),
}

impl CliError {
    /// Map error to an exit code (see sysexits.h).
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 78, // EX_CONFIG
            Self::Io(_) => 74,     // EX_IOERR
            Self::Server(_) | Self::Generation(_) => 1,
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<addrgen_core::GenerationError> for CliError {
    fn from(err: addrgen_core::GenerationError) -> Self {
        Self::Generation(err.to_string())
    }
}

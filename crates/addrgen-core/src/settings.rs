//! Generator settings and validation.
//!
//! Pure configuration types; the CLI fills them from flags and environment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default grace period between SIGTERM and SIGKILL.
pub const DEFAULT_KILL_GRACE_MS: u64 = 2000;

/// Default cap on retained process records.
pub const DEFAULT_MAX_RETAINED: usize = 500;

/// Default per-process broadcast channel capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// How to launch the external generator and how long to keep its state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Executable to run (e.g. `python3`).
    pub program: PathBuf,

    /// Arguments placed before the country name and count (e.g. `index.py`).
    pub args: Vec<String>,

    /// Working directory of the generator.
    pub working_dir: PathBuf,

    /// Milliseconds to wait after SIGTERM before sending SIGKILL.
    pub kill_grace_ms: u64,

    /// Maximum number of process records kept in memory.
    pub max_retained: usize,

    /// Events buffered per process for slow stream subscribers.
    pub event_capacity: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            program: PathBuf::from("python3"),
            args: vec!["index.py".to_string()],
            working_dir: PathBuf::from("./address"),
            kill_grace_ms: DEFAULT_KILL_GRACE_MS,
            max_retained: DEFAULT_MAX_RETAINED,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl GeneratorSettings {
    /// Settings running `program` with no leading arguments.
    pub fn for_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    #[must_use]
    pub const fn with_kill_grace_ms(mut self, ms: u64) -> Self {
        self.kill_grace_ms = ms;
        self
    }

    #[must_use]
    pub const fn with_max_retained(mut self, max: usize) -> Self {
        self.max_retained = max;
        self
    }

    pub const fn kill_grace(&self) -> Duration {
        Duration::from_millis(self.kill_grace_ms)
    }
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Generator program must not be empty")]
    EmptyProgram,

    #[error("Kill grace period must be between 100 and 60,000 ms, got {0}")]
    InvalidKillGrace(u64),

    #[error("At least one process record must be retained")]
    InvalidMaxRetained,

    #[error("Event capacity must be between 16 and 65,536, got {0}")]
    InvalidEventCapacity(usize),
}

/// Validate generator settings.
pub fn validate_settings(settings: &GeneratorSettings) -> Result<(), SettingsError> {
    if settings.program.as_os_str().is_empty() {
        return Err(SettingsError::EmptyProgram);
    }

    if !(100..=60_000).contains(&settings.kill_grace_ms) {
        return Err(SettingsError::InvalidKillGrace(settings.kill_grace_ms));
    }

    if settings.max_retained == 0 {
        return Err(SettingsError::InvalidMaxRetained);
    }

    if !(16..=65_536).contains(&settings.event_capacity) {
        return Err(SettingsError::InvalidEventCapacity(settings.event_capacity));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = GeneratorSettings::default();
        assert!(validate_settings(&settings).is_ok());
        assert_eq!(settings.kill_grace(), Duration::from_secs(2));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let too_short = GeneratorSettings::default().with_kill_grace_ms(10);
        assert!(matches!(
            validate_settings(&too_short),
            Err(SettingsError::InvalidKillGrace(10))
        ));

        let no_records = GeneratorSettings::default().with_max_retained(0);
        assert!(matches!(
            validate_settings(&no_records),
            Err(SettingsError::InvalidMaxRetained)
        ));

        let empty = GeneratorSettings::for_program("");
        assert!(matches!(
            validate_settings(&empty),
            Err(SettingsError::EmptyProgram)
        ));
    }
}

//! Core domain types and ports for addrgen.
//!
//! Holds the process record model, the output event shapes, the country
//! directory port and the generator settings. Runtime and HTTP concerns live
//! in `addrgen-runtime` and `addrgen-axum`.

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod events;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    CancelResponse, Country, ExitOutcome, GenerationRequest, ProcessId, ProcessRecord,
    ProcessStatus, StartGenerationRequest, StartGenerationResponse,
};
pub use events::{ProcessEvent, StreamEvent};
pub use ports::{CountryDirectoryPort, GenerationError, StaticCountryDirectory};
pub use settings::{
    DEFAULT_EVENT_CAPACITY, DEFAULT_KILL_GRACE_MS, DEFAULT_MAX_RETAINED, GeneratorSettings,
    SettingsError, validate_settings,
};

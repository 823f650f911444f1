//! Core domain types.
//!
//! These are pure data types with no infrastructure dependencies.

mod country;
mod generation;
mod process;

pub use country::Country;
pub use generation::{
    CancelResponse, GenerationRequest, StartGenerationRequest, StartGenerationResponse,
};
pub use process::{ExitOutcome, ProcessId, ProcessRecord, ProcessStatus};

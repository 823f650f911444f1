//! Process runtime for addrgen.
//!
//! Spawns the external address generator, tracks each job in an injected
//! [`ProcessRegistry`], streams its output to any number of subscribers and
//! handles cancellation with SIGTERM → SIGKILL escalation.

#![deny(unused_crate_dependencies)]

pub mod countries;
pub mod generation;
mod output;
pub mod registry;

pub use countries::JsonCountryDirectory;
pub use generation::GenerationService;
pub use registry::{ControlCommand, OutputKind, ProcessControl, ProcessRegistry, Subscription};

// Dev-dependencies used only by the integration tests
#[cfg(test)]
use tokio_test as _;

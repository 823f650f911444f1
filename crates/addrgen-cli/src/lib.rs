//! Command-line entry points for addrgen.
//!
//! `addrgen web` runs the admin API; `addrgen countries` prints the country
//! directory the generator will be labelled from.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by main.rs binary
use dotenvy as _;
use tokio as _;
use tracing_subscriber as _;

pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

pub use commands::{Commands, GeneratorArgs, LocationArgs, WebArgs};
pub use error::CliError;
pub use parser::Cli;

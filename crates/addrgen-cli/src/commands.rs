//! Main commands enum and shared argument groups.
//!
//! Every generator option can also be set through an `ADDRGEN_*` variable,
//! including from a `.env` file.

use std::path::PathBuf;

use addrgen_axum::bootstrap::{COUNTRIES_FILE_NAME, DEFAULT_PORT};
use addrgen_core::{
    DEFAULT_EVENT_CAPACITY, DEFAULT_KILL_GRACE_MS, DEFAULT_MAX_RETAINED, GeneratorSettings,
    validate_settings,
};
use clap::{Args, Subcommand};

use crate::error::CliError;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Start the admin web server
    Web(WebArgs),

    /// List the countries known to the generator
    Countries(LocationArgs),
}

/// Where the generator lives and where its country cache is.
#[derive(Debug, Clone, Args)]
pub struct LocationArgs {
    /// Working directory of the generator
    #[arg(long, env = "ADDRGEN_GENERATOR_DIR", default_value = "./address")]
    pub generator_dir: PathBuf,

    /// Country cache file [default: <generator-dir>/countries_cache.json]
    #[arg(long, env = "ADDRGEN_COUNTRIES_FILE")]
    pub countries_file: Option<PathBuf>,
}

impl LocationArgs {
    pub fn countries_file(&self) -> PathBuf {
        self.countries_file
            .clone()
            .unwrap_or_else(|| self.generator_dir.join(COUNTRIES_FILE_NAME))
    }
}

/// How to run the generator.
#[derive(Debug, Clone, Args)]
pub struct GeneratorArgs {
    #[command(flatten)]
    pub location: LocationArgs,

    /// Generator executable
    #[arg(long, env = "ADDRGEN_GENERATOR_PROGRAM", default_value = "python3")]
    pub generator_program: PathBuf,

    /// Argument passed before the country name and count (repeatable)
    #[arg(
        long = "generator-arg",
        env = "ADDRGEN_GENERATOR_ARGS",
        value_delimiter = ',',
        default_value = "index.py",
        allow_hyphen_values = true
    )]
    pub generator_args: Vec<String>,

    /// Milliseconds between SIGTERM and SIGKILL when cancelling
    #[arg(long, env = "ADDRGEN_KILL_GRACE_MS", default_value_t = DEFAULT_KILL_GRACE_MS)]
    pub kill_grace_ms: u64,

    /// Maximum number of process records kept in memory
    #[arg(long, env = "ADDRGEN_MAX_RETAINED", default_value_t = DEFAULT_MAX_RETAINED)]
    pub max_retained: usize,

    /// Events buffered per process for slow stream viewers
    #[arg(long, env = "ADDRGEN_EVENT_CAPACITY", default_value_t = DEFAULT_EVENT_CAPACITY)]
    pub event_capacity: usize,
}

impl GeneratorArgs {
    /// Build validated generator settings.
    pub fn to_settings(&self) -> Result<GeneratorSettings, CliError> {
        let settings = GeneratorSettings {
            program: self.generator_program.clone(),
            args: self.generator_args.clone(),
            working_dir: self.location.generator_dir.clone(),
            kill_grace_ms: self.kill_grace_ms,
            max_retained: self.max_retained,
            event_capacity: self.event_capacity,
        };
        validate_settings(&settings)?;
        Ok(settings)
    }
}

/// Options for `addrgen web`.
#[derive(Debug, Clone, Args)]
pub struct WebArgs {
    /// Port to serve the API on
    #[arg(short, long, env = "ADDRGEN_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory containing a built dashboard to serve with SPA fallback
    #[arg(long, env = "ADDRGEN_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Allowed CORS origin (repeatable). All origins are allowed if unset.
    #[arg(long = "allowed-origin")]
    pub allowed_origins: Vec<String>,

    #[command(flatten)]
    pub generator: GeneratorArgs,
}

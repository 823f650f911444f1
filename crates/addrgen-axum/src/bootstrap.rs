//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where the web adapter's services are wired
//! together. The country directory and the generation service are built here
//! and handed to the router as shared state.

use std::path::PathBuf;
use std::sync::Arc;

use addrgen_core::{CountryDirectoryPort, GeneratorSettings, validate_settings};
use addrgen_runtime::{GenerationService, JsonCountryDirectory};
use anyhow::{Context, Result};

/// Default HTTP port for the admin API.
pub const DEFAULT_PORT: u16 = 8787;

/// File name of the country cache inside the generator directory.
pub const COUNTRIES_FILE_NAME: &str = "countries_cache.json";

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP server.
    pub port: u16,
    /// How to launch the generator and how long to keep its records.
    pub generator: GeneratorSettings,
    /// JSON file mapping country codes to display names.
    pub countries_file: PathBuf,
    /// Optional path to static assets for SPA serving.
    pub static_dir: Option<PathBuf>,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Create config with default generator settings.
    pub fn with_defaults() -> Self {
        Self::for_generator(GeneratorSettings::default())
    }

    /// Create config around the given generator settings. The country file
    /// defaults to the cache inside the generator's working directory.
    pub fn for_generator(generator: GeneratorSettings) -> Self {
        let countries_file = generator.working_dir.join(COUNTRIES_FILE_NAME);
        Self {
            port: DEFAULT_PORT,
            generator,
            countries_file,
            static_dir: None,
            cors: CorsConfig::default(),
        }
    }

    /// Set the static directory for SPA serving.
    #[must_use]
    pub fn with_static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(path.into());
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// Generation process control plane.
    pub generation: Arc<GenerationService>,
}

impl AxumContext {
    pub fn new(generation: Arc<GenerationService>) -> Self {
        Self { generation }
    }
}

/// Bootstrap the Axum server with all services.
///
/// Fails on invalid generator settings. A missing country file is not an
/// error; names then fall back to country codes.
pub async fn bootstrap(config: ServerConfig) -> Result<AxumContext> {
    validate_settings(&config.generator).context("Invalid generator settings")?;

    tracing::info!(
        target: "addrgen.paths",
        program = %config.generator.program.display(),
        args = ?config.generator.args,
        working_dir = %config.generator.working_dir.display(),
        countries_file = %config.countries_file.display(),
        kill_grace_ms = config.generator.kill_grace_ms,
        max_retained = config.generator.max_retained,
        "Axum bootstrap resolved generator settings"
    );

    let directory = Arc::new(JsonCountryDirectory::new(config.countries_file));

    // Load the directory up front so a bad file shows up in the startup log
    let countries = directory.list().await?;
    if countries.is_empty() {
        tracing::warn!("No countries loaded, generation will use raw country codes");
    }

    let generation = Arc::new(GenerationService::new(config.generator, directory));
    Ok(AxumContext::new(generation))
}

/// Start the web server on the specified port.
///
/// If `config.static_dir` is set, serves static assets with SPA fallback.
/// Otherwise, serves only the API endpoints.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;
    use tracing::info;

    let ctx = bootstrap(config.clone()).await?;

    let app = if let Some(ref static_dir) = config.static_dir {
        info!("Serving static assets from: {}", static_dir.display());
        crate::routes::create_spa_router(ctx, static_dir, &config.cors)
    } else {
        crate::routes::create_router(ctx, &config.cors)
    };

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    if config.static_dir.is_some() {
        info!("addrgen web server (with UI) listening on http://{}", addr);
    } else {
        info!("addrgen web server (API only) listening on http://{}", addr);
    }

    axum::serve(listener, app).await?;
    Ok(())
}

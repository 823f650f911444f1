//! Axum web adapter for addrgen.
//!
//! Exposes the generation service over HTTP: JSON endpoints for launching,
//! listing and cancelling generator processes, plus a per-process SSE stream.
//! All process management lives in `addrgen-runtime`; handlers only translate.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Dev-dependencies used by the integration tests
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_test as _;
#[cfg(test)]
use tower as _;

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod sse;
pub mod state;

// Re-export primary types
pub use bootstrap::{AxumContext, CorsConfig, ServerConfig, bootstrap, start_server};
pub use error::HttpError;
pub use routes::{create_router, create_spa_router};
pub use state::AppState;

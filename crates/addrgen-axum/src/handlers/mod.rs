//! HTTP request handlers for the Axum web server.
//!
//! Handlers are thin wrappers that delegate to `GenerationService`.

pub mod countries;
pub mod generation;

//! Shared fixtures for addrgen-axum integration tests.

// Not every test binary uses every helper
#![allow(dead_code)]

use std::path::Path;

use addrgen_axum::bootstrap::{CorsConfig, ServerConfig, bootstrap};
use addrgen_axum::routes::create_router;
use addrgen_core::GeneratorSettings;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use tempfile::TempDir;

/// Country cache in the generator's on-disk format.
pub const COUNTRIES_JSON: &str = r#"{
    "US": {"name": "United States"},
    "FR": {"name": "France"},
    "DE": {"name": "Germany"}
}"#;

/// Generator that can never be spawned.
pub const MISSING_GENERATOR: &str = "/nonexistent/address-generator";

/// Write the country cache into `dir` and return a config pointing at it.
pub fn test_config(dir: &Path, generator: GeneratorSettings) -> ServerConfig {
    let countries_file = dir.join("countries_cache.json");
    std::fs::write(&countries_file, COUNTRIES_JSON).unwrap();

    ServerConfig {
        port: 0, // Not used in tests
        generator: generator.with_working_dir(dir),
        countries_file,
        static_dir: None,
        cors: CorsConfig::AllowAll,
    }
}

/// Router whose generator fails to spawn.
pub async fn app_without_generator(dir: &TempDir) -> Router {
    let config = test_config(dir.path(), GeneratorSettings::for_program(MISSING_GENERATOR));
    create_router(bootstrap(config).await.unwrap(), &CorsConfig::AllowAll)
}

/// Router running `sh -c <script> <country name> <count>`.
pub async fn app_with_script(dir: &TempDir, script: &str) -> Router {
    let generator = GeneratorSettings::for_program("sh")
        .with_args(vec!["-c".to_string(), script.to_string()])
        .with_kill_grace_ms(500);
    let config = test_config(dir.path(), generator);
    create_router(bootstrap(config).await.unwrap(), &CorsConfig::AllowAll)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, json: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

pub fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

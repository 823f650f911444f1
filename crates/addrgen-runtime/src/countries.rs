//! Country directory backed by the generator's country cache file.
//!
//! The file maps two-letter codes to objects carrying a display name:
//!
//! ```json
//! { "US": { "name": "United States" }, "DE": { "name": "Germany" } }
//! ```
//!
//! The generator's own city list uses `country_name` instead of `name`;
//! both are accepted.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use addrgen_core::{Country, CountryDirectoryPort, GenerationError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct CountryEntry {
    #[serde(alias = "country_name")]
    name: String,
}

/// Country directory loaded lazily from a JSON file.
///
/// The file is read once, on first use. A missing or malformed file yields
/// an empty directory (every lookup then falls back to the code) and a
/// warning in the log.
pub struct JsonCountryDirectory {
    path: PathBuf,
    countries: OnceCell<Vec<Country>>,
}

impl JsonCountryDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            countries: OnceCell::new(),
        }
    }

    async fn countries(&self) -> &[Country] {
        self.countries
            .get_or_init(|| async {
                match load_file(&self.path).await {
                    Ok(countries) => {
                        info!(
                            path = %self.path.display(),
                            count = countries.len(),
                            "Loaded country directory"
                        );
                        countries
                    }
                    Err(e) => {
                        warn!(
                            path = %self.path.display(),
                            error = %format!("{e:#}"),
                            "Country directory unavailable, names will fall back to codes"
                        );
                        Vec::new()
                    }
                }
            })
            .await
    }
}

async fn load_file(path: &Path) -> Result<Vec<Country>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_countries(&raw)
}

fn parse_countries(raw: &str) -> Result<Vec<Country>> {
    let entries: HashMap<String, CountryEntry> =
        serde_json::from_str(raw).context("Invalid country directory JSON")?;

    let mut countries: Vec<Country> = entries
        .into_iter()
        .filter(|(code, _)| code.chars().count() == 2)
        .map(|(code, entry)| Country::new(code, entry.name))
        .collect();
    countries.sort_by(|a, b| a.code.cmp(&b.code));
    Ok(countries)
}

#[async_trait]
impl CountryDirectoryPort for JsonCountryDirectory {
    async fn lookup(&self, code: &str) -> Result<Option<Country>, GenerationError> {
        Ok(self
            .countries()
            .await
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Country>, GenerationError> {
        Ok(self.countries().await.to_vec())
    }
}

//! Country directory port.
//!
//! Resolves two-letter codes to the display names the generator expects.
//! The backing data (a cache file, a database collection) is an adapter
//! concern.

use async_trait::async_trait;

use super::GenerationError;
use crate::domain::Country;

/// Port for country metadata lookups.
#[async_trait]
pub trait CountryDirectoryPort: Send + Sync {
    /// Look up a country by its upper-cased two-letter code.
    ///
    /// `Ok(None)` means the code is unknown; callers fall back to the code.
    async fn lookup(&self, code: &str) -> Result<Option<Country>, GenerationError>;

    /// All known countries, sorted by code.
    async fn list(&self) -> Result<Vec<Country>, GenerationError>;
}

/// In-memory directory, mostly for tests and CLI contexts without a file.
#[derive(Debug, Clone, Default)]
pub struct StaticCountryDirectory {
    countries: Vec<Country>,
}

impl StaticCountryDirectory {
    pub fn new(countries: impl IntoIterator<Item = Country>) -> Self {
        let mut countries: Vec<Country> = countries.into_iter().collect();
        countries.sort_by(|a, b| a.code.cmp(&b.code));
        Self { countries }
    }
}

#[async_trait]
impl CountryDirectoryPort for StaticCountryDirectory {
    async fn lookup(&self, code: &str) -> Result<Option<Country>, GenerationError> {
        Ok(self
            .countries
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Country>, GenerationError> {
        Ok(self.countries.clone())
    }
}

//! Country metadata used to label generation jobs.

use serde::{Deserialize, Serialize};

/// A country known to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Two-letter code, upper-cased.
    pub code: String,
    /// Display name passed to the generator.
    pub name: String,
}

impl Country {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into().to_uppercase(),
            name: name.into(),
        }
    }
}

//! Request and response shapes for the generation operations.

use serde::{Deserialize, Serialize};

use super::process::{ProcessId, ProcessStatus};
use crate::ports::GenerationError;

/// Raw start request as received from a caller.
///
/// Both fields default so that missing values are reported as validation
/// errors instead of deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGenerationRequest {
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub count: Option<i64>,
}

impl StartGenerationRequest {
    pub fn new(country_code: impl Into<String>, count: i64) -> Self {
        Self {
            country_code: country_code.into(),
            count: Some(count),
        }
    }

    /// Check the request shape and upper-case the country code.
    ///
    /// The code is taken as sent: surrounding whitespace counts toward its
    /// length.
    pub fn validate(&self) -> Result<GenerationRequest, GenerationError> {
        let code = self.country_code.as_str();
        if code.chars().count() != 2 {
            return Err(GenerationError::Validation(format!(
                "Country code must be exactly 2 characters, got '{}'",
                self.country_code
            )));
        }

        let count = match self.count {
            None => {
                return Err(GenerationError::Validation(
                    "Count is required".to_string(),
                ));
            }
            Some(n) if n <= 0 => {
                return Err(GenerationError::Validation(format!(
                    "Count must be a positive integer, got {n}"
                )));
            }
            Some(n) => u32::try_from(n).map_err(|_| {
                GenerationError::Validation(format!("Count {n} is too large"))
            })?,
        };

        Ok(GenerationRequest {
            country_code: code.to_uppercase(),
            count,
        })
    }
}

/// A validated start request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub country_code: String,
    pub count: u32,
}

/// Returned by a successful launch. `status` is always `"started"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGenerationResponse {
    pub process_id: ProcessId,
    pub country_code: String,
    pub country_name: String,
    pub count: u32,
    pub status: String,
}

impl StartGenerationResponse {
    pub fn started(
        process_id: ProcessId,
        country_code: String,
        country_name: String,
        count: u32,
    ) -> Self {
        Self {
            process_id,
            country_code,
            country_name,
            count,
            status: "started".to_string(),
        }
    }
}

/// Returned by a successful cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelResponse {
    pub process_id: ProcessId,
    pub status: ProcessStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_one_letter_code() {
        let err = StartGenerationRequest::new("U", 10).validate().unwrap_err();
        assert!(matches!(err, GenerationError::Validation(_)));
    }

    #[test]
    fn padded_code_is_not_trimmed() {
        for code in [" US ", "US ", "\tUS"] {
            let err = StartGenerationRequest::new(code, 10).validate().unwrap_err();
            assert!(matches!(err, GenerationError::Validation(_)), "{code:?}");
        }
    }

    #[test]
    fn rejects_non_positive_or_missing_count() {
        assert!(StartGenerationRequest::new("US", 0).validate().is_err());
        assert!(StartGenerationRequest::new("US", -5).validate().is_err());

        let missing = StartGenerationRequest {
            country_code: "US".into(),
            count: None,
        };
        assert!(missing.validate().is_err());
    }

    #[test]
    fn normalizes_code_to_upper_case() {
        let req = StartGenerationRequest::new("de", 25).validate().unwrap();
        assert_eq!(req.country_code, "DE");
        assert_eq!(req.count, 25);
    }

    #[test]
    fn missing_count_deserializes_as_none() {
        let req: StartGenerationRequest =
            serde_json::from_str(r#"{"countryCode":"US"}"#).unwrap();
        assert_eq!(req.count, None);
    }
}

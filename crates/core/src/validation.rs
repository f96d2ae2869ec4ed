//! Input validation for imported prompts and configuration
//!
//! Collects every problem instead of stopping at the first, so a broken
//! export can be fixed in one pass.
//!
//! # Example
//!
//! ```rust
//! use promptvault_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("title", "Code Review")
//!     .range("max_results", 50, 1, 1000)
//!     .validate();
//!
//! assert!(result.is_valid());
//! ```

use crate::error::{Error, ErrorCode, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
    /// Expected value (if applicable)
    pub expected: Option<String>,
    /// Actual value (if applicable)
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get all warnings
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: ValidationError) {
        self.warnings.push(warning);
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Convert to Result type
    ///
    /// # Errors
    /// A validation error listing every failed field.
    pub fn to_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
            Err(Error::new(
                ErrorCode::ValidationError,
                format!("Validation failed: {}", messages.join("; ")),
            ))
        }
    }
}

/// Fluent validator builder
pub struct Validator {
    result: ValidationResult,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self {
            result: ValidationResult::new(),
        }
    }

    /// Validate that a field is not blank
    #[must_use]
    pub fn required(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: "Field is required".to_string(),
                code: "REQUIRED".to_string(),
                expected: Some("non-empty value".to_string()),
                actual: Some("empty".to_string()),
            });
        }
        self
    }

    /// Validate that a JSON field is a non-blank string
    #[must_use]
    pub fn required_string(self, field: &str, value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) => self.required(field, s),
            other => self.type_mismatch(field, "a string", other),
        }
    }

    /// Validate that an optional JSON field is an array of strings
    ///
    /// A missing or null field passes.
    #[must_use]
    pub fn string_array(self, field: &str, value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => self,
            Some(Value::Array(items)) if items.iter().all(Value::is_string) => self,
            other => self.type_mismatch(field, "an array of strings", other),
        }
    }

    /// Validate that a value is in a list of allowed values
    #[must_use]
    pub fn one_of(mut self, field: &str, value: &str, allowed: &[&str]) -> Self {
        if !allowed.contains(&value) {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: format!("Must be one of: {}", allowed.join(", ")),
                code: "ONE_OF".to_string(),
                expected: Some(allowed.join(", ")),
                actual: Some(value.to_string()),
            });
        }
        self
    }

    /// Validate a numeric range
    #[must_use]
    pub fn range<T: PartialOrd + std::fmt::Display>(
        mut self,
        field: &str,
        value: T,
        min: T,
        max: T,
    ) -> Self {
        if value < min || value > max {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: format!("Must be between {min} and {max}"),
                code: "RANGE".to_string(),
                expected: Some(format!("{min} - {max}")),
                actual: Some(value.to_string()),
            });
        }
        self
    }

    /// Add a warning (non-blocking)
    #[must_use]
    pub fn warn_if(mut self, field: &str, condition: bool, message: &str) -> Self {
        if condition {
            self.result.add_warning(ValidationError {
                field: field.to_string(),
                message: message.to_string(),
                code: "WARNING".to_string(),
                expected: None,
                actual: None,
            });
        }
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> ValidationResult {
        self.result
    }

    fn type_mismatch(mut self, field: &str, expected: &str, actual: Option<&Value>) -> Self {
        self.result.add_error(ValidationError {
            field: field.to_string(),
            message: format!("Must be {expected}"),
            code: "TYPE".to_string(),
            expected: Some(expected.to_string()),
            actual: Some(json_type(actual).to_string()),
        });
        self
    }
}

fn json_type(value: Option<&Value>) -> &'static str {
    match value {
        None => "missing",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_validation() {
        let result = Validator::new().required("title", "   ").validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "REQUIRED");
    }

    #[test]
    fn test_required_string_rejects_other_types() {
        let value = json!(42);
        let result = Validator::new().required_string("title", Some(&value)).validate();
        assert_eq!(result.errors()[0].code, "TYPE");
        assert_eq!(result.errors()[0].actual.as_deref(), Some("number"));

        let result = Validator::new().required_string("title", None).validate();
        assert_eq!(result.errors()[0].actual.as_deref(), Some("missing"));
    }

    #[test]
    fn test_string_array() {
        let good = json!(["a", "b"]);
        let bad = json!(["a", 1]);
        let null = Value::Null;

        assert!(Validator::new().string_array("tags", Some(&good)).validate().is_valid());
        assert!(Validator::new().string_array("tags", Some(&null)).validate().is_valid());
        assert!(Validator::new().string_array("tags", None).validate().is_valid());
        assert!(!Validator::new().string_array("tags", Some(&bad)).validate().is_valid());
    }

    #[test]
    fn test_one_of_validation() {
        let result = Validator::new()
            .one_of("level", "loud", &["error", "warn", "info"])
            .validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "ONE_OF");
    }

    #[test]
    fn test_range_validation() {
        let result = Validator::new().range("count", 0, 1, 100).validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "RANGE");
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let result = Validator::new().warn_if("id", true, "Duplicate id").validate();
        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 1);
    }

    #[test]
    fn test_to_result_lists_fields() {
        let err = Validator::new()
            .required("prompts[0].title", "")
            .required("prompts[1].content", "")
            .validate()
            .to_result()
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("prompts[0].title"));
        assert!(err.message.contains("prompts[1].content"));
    }

    #[test]
    fn test_chained_validation() {
        let result = Validator::new()
            .required("title", "Code Review")
            .range("limit", 5, 1, 10)
            .one_of("sort", "usage", &["relevance", "usage"])
            .validate();
        assert!(result.is_valid());
    }
}

//! Prompt library import
//!
//! Reads the JSON document the browser extension exports:
//!
//! ```json
//! { "version": "1.0.0", "exportDate": "...", "prompts": [ ... ], "settings": { ... } }
//! ```
//!
//! A bare array of prompts is accepted too. Every prompt is validated before
//! any is converted, and gaps an older export may have (ids, timestamps,
//! usage counts) are filled in.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use promptvault_search::Record;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Error, Result, ResultExt};
use crate::validation::{ValidationError, ValidationResult, Validator};

/// Settings stored alongside an exported library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LibrarySettings {
    /// Colour theme
    pub theme: String,
    /// Show a preview when hovering a suggestion
    pub show_preview_tooltips: bool,
    /// Suggestions shown per popup
    pub max_suggestions: usize,
    /// Keyboard shortcuts enabled
    pub enable_keyboard_shortcuts: bool,
    /// Tag name to hex colour
    pub tag_colors: BTreeMap<String, String>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        let tag_colors = [
            ("work", "#FF6B6B"),
            ("personal", "#4ECDC4"),
            ("creative", "#45B7D1"),
            ("technical", "#96CEB4"),
            ("marketing", "#FFEAA7"),
            ("research", "#DDA0DD"),
            ("default", "#74B9FF"),
        ]
        .into_iter()
        .map(|(tag, color)| (tag.to_string(), color.to_string()))
        .collect();

        Self {
            theme: "dark".to_string(),
            show_preview_tooltips: true,
            max_suggestions: promptvault_search::DEFAULT_MAX_SUGGESTIONS,
            enable_keyboard_shortcuts: true,
            tag_colors,
        }
    }
}

/// An imported prompt library.
#[derive(Debug, Clone)]
pub struct Library {
    records: Vec<Record>,
    settings: LibrarySettings,
    version: Option<String>,
    exported_at: Option<DateTime<Utc>>,
    report: ValidationResult,
}

impl Library {
    /// Load an exported library file.
    ///
    /// # Errors
    /// Unreadable file, malformed JSON, or prompts failing validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::file_not_found(path).with_source(e)
                } else {
                    Error::from(e)
                }
            })
            .context(format!("Loading prompt library {}", path.display()))?;

        let library = Self::from_json(&json).context(format!("Importing {}", path.display()))?;
        debug!(path = %path.display(), records = library.len(), "Loaded library");
        Ok(library)
    }

    /// Import a library document, filling gaps with the current time.
    ///
    /// # Errors
    /// Malformed JSON, a document without a prompts array, or prompts
    /// failing validation.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_json_at(json, Utc::now())
    }

    /// Import a library document, filling gaps with `now`.
    ///
    /// # Errors
    /// See [`Library::from_json`].
    pub fn from_json_at(json: &str, now: DateTime<Utc>) -> Result<Self> {
        let document: Value = serde_json::from_str(json)?;

        let (prompts, settings, version, exported_at) = match document {
            Value::Array(prompts) => (prompts, None, None, None),
            Value::Object(mut doc) => {
                let Some(Value::Array(prompts)) = doc.remove("prompts") else {
                    return Err(Error::invalid_library("Invalid import data: prompts array required"));
                };
                let version = doc.get("version").and_then(Value::as_str).map(String::from);
                let exported_at = doc
                    .get("exportDate")
                    .and_then(Value::as_str)
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .map(|dt| dt.with_timezone(&Utc));
                (prompts, doc.remove("settings"), version, exported_at)
            }
            _ => {
                return Err(Error::invalid_library(
                    "Invalid import data: expected an export document or an array of prompts",
                ));
            }
        };

        let mut report = validate_prompts(&prompts);
        report.clone().to_result()?;

        let records = prompts
            .into_iter()
            .enumerate()
            .map(|(index, prompt)| normalize(prompt, now, index))
            .collect::<Result<Vec<_>>>()?;

        report.merge(check_duplicates(&records));
        for warning in report.warnings() {
            warn!(field = %warning.field, "{}", warning.message);
        }

        let settings = match settings {
            None | Some(Value::Null) => LibrarySettings::default(),
            Some(value) => serde_json::from_value(value)
                .map_err(Error::from)
                .context("Reading library settings")?,
        };

        Ok(Self {
            records,
            settings,
            version,
            exported_at,
            report,
        })
    }

    /// Imported records in file order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consume the library, keeping only its records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Library settings, defaults filled in.
    pub fn settings(&self) -> &LibrarySettings {
        &self.settings
    }

    /// Export format version, if the document had one.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Export timestamp, if the document had a valid one.
    pub fn exported_at(&self) -> Option<DateTime<Utc>> {
        self.exported_at
    }

    /// Warnings raised during import.
    pub fn report(&self) -> &ValidationResult {
        &self.report
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the library has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by id.
    pub fn find(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }
}

fn validate_prompts(prompts: &[Value]) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (index, prompt) in prompts.iter().enumerate() {
        let field = |name: &str| format!("prompts[{index}].{name}");
        let validator = Validator::new();

        let validator = match prompt.as_object() {
            Some(object) => validator
                .required_string(&field("title"), object.get("title"))
                .required_string(&field("content"), object.get("content"))
                .string_array(&field("tags"), object.get("tags")),
            None => {
                result.add_error(ValidationError {
                    field: format!("prompts[{index}]"),
                    message: "Must be an object".to_string(),
                    code: "TYPE".to_string(),
                    expected: Some("object".to_string()),
                    actual: None,
                });
                validator
            }
        };

        result.merge(validator.validate());
    }

    result
}

fn check_duplicates(records: &[Record]) -> ValidationResult {
    let mut seen = HashSet::new();
    let mut validator = Validator::new();

    for (index, record) in records.iter().enumerate() {
        let duplicate = !seen.insert(record.id.as_str());
        validator = validator.warn_if(
            &format!("prompts[{index}].id"),
            duplicate,
            &format!("Duplicate id {}", record.id),
        );
    }

    validator.validate()
}

/// Fill gaps in an already validated prompt and convert it.
fn normalize(prompt: Value, now: DateTime<Utc>, index: usize) -> Result<Record> {
    let Value::Object(mut object) = prompt else {
        return Err(Error::invalid_library(format!("prompts[{index}] is not an object")));
    };

    let timestamp = Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true));

    if !is_non_empty_string(object.get("id")) {
        object.insert("id".to_string(), Value::String(uuid::Uuid::new_v4().to_string()));
    }
    fill_if_falsy(&mut object, "createdAt", &timestamp);
    fill_if_falsy(&mut object, "updatedAt", &timestamp);
    fill_if_falsy(&mut object, "usageCount", &Value::from(0));
    if !is_non_empty_string(object.get("lastUsed")) {
        object.insert("lastUsed".to_string(), Value::Null);
    }

    serde_json::from_value(Value::Object(object))
        .map_err(|e| Error::invalid_library(format!("prompts[{index}]: {e}")).with_source(e))
}

fn is_non_empty_string(value: Option<&Value>) -> bool {
    value.and_then(Value::as_str).is_some_and(|s| !s.is_empty())
}

/// Replace a missing, null, empty-string, zero or false value.
fn fill_if_falsy(object: &mut Map<String, Value>, key: &str, fallback: &Value) {
    let falsy = match object.get(key) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Bool(b)) => !b,
        Some(_) => false,
    };
    if falsy {
        object.insert(key.to_string(), fallback.clone());
    }
}

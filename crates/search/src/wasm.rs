//! WASM bindings for the ranking engine.
//!
//! Records, options and results cross the boundary as JSON strings in the
//! same camelCase layout the extension stores. Malformed input yields `[]`.

use wasm_bindgen::prelude::*;

use crate::ranking::SearchOptions;
use crate::record::{parse_records, Record};
use crate::suggest::SuggestionOptions;

fn records_or_empty(records_json: &str) -> Vec<Record> {
    parse_records(records_json).unwrap_or_default()
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}

/// Search records and return ranked results as JSON.
///
/// # Arguments
/// * `records_json` - JSON array of records
/// * `query` - Search query (blank returns the filtered set unscored)
/// * `options_json` - JSON search options; empty or invalid means defaults
#[wasm_bindgen(js_name = searchRecords)]
pub fn search_records(records_json: &str, query: &str, options_json: &str) -> String {
    let records = records_or_empty(records_json);
    let options: SearchOptions = serde_json::from_str(options_json).unwrap_or_default();
    to_json(&crate::rank(&records, query, &options))
}

/// Suggest records as of now and return them as JSON.
#[wasm_bindgen(js_name = suggestRecords)]
pub fn suggest_records(records_json: &str, options_json: &str) -> String {
    let records = records_or_empty(records_json);
    let options: SuggestionOptions = serde_json::from_str(options_json).unwrap_or_default();
    to_json(&crate::suggest(&records, &options))
}

/// Distinct lowercased tags as a JSON array.
#[wasm_bindgen(js_name = extractTags)]
pub fn extract_tags_json(records_json: &str) -> String {
    to_json(&crate::extract_tags(&records_or_empty(records_json)))
}

/// Tag completions for a partial input as a JSON array.
#[wasm_bindgen(js_name = suggestTags)]
pub fn suggest_tags_json(records_json: &str, partial: &str, limit: usize) -> String {
    to_json(&crate::suggest_tags(&records_or_empty(records_json), partial, limit))
}

/// Fuzzy score of a query against a single text.
#[wasm_bindgen(js_name = fuzzyScore)]
pub fn score_text(query: &str, text: &str) -> f64 {
    crate::fuzzy_score(query, text)
}

/// Query of the slash command ending at `cursor`, if any.
#[wasm_bindgen(js_name = detectSlashQuery)]
pub fn detect_slash_query(text: &str, cursor: usize) -> Option<String> {
    crate::detect_slash_command(text, cursor).map(|command| command.query)
}

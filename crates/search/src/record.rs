//! Records and the annotated results produced from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Result;

/// A stored snippet as supplied by the caller.
///
/// The engine only reads records; every result carries its own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Opaque identity key
    pub id: String,
    /// Display title, searched first
    pub title: String,
    /// Snippet body
    pub content: String,
    /// Tags in insertion order; a missing or null list reads as empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    /// How many times the snippet was used; null or non-numeric reads as 0
    #[serde(default, deserialize_with = "lenient_count")]
    pub usage_count: u32,
    /// Last use, if ever; null, empty or unparseable reads as never
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_used: Option<DateTime<Utc>>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last edit time
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f.trunc() as u64))
            .unwrap_or(0),
        _ => 0,
    };
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s.parse().ok(),
        _ => None,
    })
}

impl Record {
    /// Creates a record with no tags and no usage.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            usage_count: 0,
            last_used: None,
            created_at,
            updated_at: None,
        }
    }

    /// Replaces the tag list.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets usage statistics.
    #[must_use]
    pub fn with_usage(mut self, usage_count: u32, last_used: Option<DateTime<Utc>>) -> Self {
        self.usage_count = usage_count;
        self.last_used = last_used;
        self
    }

    /// Sets the last edit time.
    #[must_use]
    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Last edit time, falling back to creation time.
    pub fn updated_or_created(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }

    /// Most recent activity: last use, then last edit, then creation.
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_used.unwrap_or_else(|| self.updated_or_created())
    }

    /// Last use, with "never" mapped to the Unix epoch.
    pub fn last_used_or_epoch(&self) -> DateTime<Utc> {
        self.last_used.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Parse a JSON array of records.
pub fn parse_records(json: &str) -> Result<Vec<Record>> {
    Ok(serde_json::from_str(json)?)
}

/// Field that produced the winning score of a search hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchLocation {
    /// Title
    Title,
    /// Tag list
    Tags,
    /// Content body
    Content,
}

impl MatchLocation {
    /// Lowercase name as used in JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Tags => "tags",
            Self::Content => "content",
        }
    }
}

/// A record returned from a search.
///
/// Annotations are only present when a non-empty query was scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Copy of the matched record
    #[serde(flatten)]
    pub record: Record,
    /// Composite relevance score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_score: Option<f64>,
    /// Field the score came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_in: Option<MatchLocation>,
}

impl SearchResult {
    /// Wraps a record without score annotations.
    pub fn unscored(record: Record) -> Self {
        Self {
            record,
            search_score: None,
            matched_in: None,
        }
    }

    /// Wraps a record with a score and match location.
    pub fn scored(record: Record, score: f64, matched_in: MatchLocation) -> Self {
        Self {
            record,
            search_score: Some(score),
            matched_in: Some(matched_in),
        }
    }
}

/// A record returned from the suggestion engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResult {
    /// Copy of the suggested record
    #[serde(flatten)]
    pub record: Record,
    /// Blended usage, recency and context score
    pub suggestion_score: f64,
    /// Context relevance, when a context search ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_score: Option<f64>,
    /// Field the context matched in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_in: Option<MatchLocation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_missing_and_null_tags_read_as_empty() {
        let json = r#"[
            {"id": "1", "title": "A", "content": "a", "createdAt": "2024-01-01T10:00:00Z"},
            {"id": "2", "title": "B", "content": "b", "tags": null, "lastUsed": null,
             "createdAt": "2024-01-01T10:00:00Z"}
        ]"#;
        let records = parse_records(json).unwrap();

        assert!(records[0].tags.is_empty());
        assert!(records[1].tags.is_empty());
        assert_eq!(records[1].usage_count, 0);
        assert!(records[1].last_used.is_none());
    }

    #[test]
    fn test_null_and_empty_optional_fields_do_not_fail_the_array() {
        let json = r#"[
            {"id": "1", "title": "A", "content": "a", "usageCount": 4,
             "createdAt": "2024-01-01T10:00:00Z"},
            {"id": "2", "title": "B", "content": "b", "usageCount": null, "lastUsed": "",
             "updatedAt": null, "createdAt": "2024-01-01T10:00:00Z"},
            {"id": "3", "title": "C", "content": "c", "usageCount": "many", "lastUsed": "soon",
             "updatedAt": "", "createdAt": "2024-01-01T10:00:00Z"}
        ]"#;
        let records = parse_records(json).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].usage_count, 4);
        for record in &records[1..] {
            assert_eq!(record.usage_count, 0);
            assert!(record.last_used.is_none());
            assert!(record.updated_at.is_none());
        }
    }

    #[test]
    fn test_timestamps_still_parse() {
        let json = r#"[{"id": "1", "title": "A", "content": "a", "usageCount": 2.0,
            "lastUsed": "2024-01-05T10:00:00Z", "updatedAt": "2024-01-03T10:00:00Z",
            "createdAt": "2024-01-01T10:00:00Z"}]"#;
        let record = &parse_records(json).unwrap()[0];

        assert_eq!(record.usage_count, 2);
        assert_eq!(record.last_used, Some(at(5)));
        assert_eq!(record.updated_at, Some(at(3)));
    }

    #[test]
    fn test_timestamp_fallbacks() {
        let record = Record::new("1", "A", "a", at(1));
        assert_eq!(record.updated_or_created(), at(1));
        assert_eq!(record.last_activity(), at(1));
        assert_eq!(record.last_used_or_epoch(), DateTime::<Utc>::UNIX_EPOCH);

        let record = record.with_updated_at(at(3));
        assert_eq!(record.last_activity(), at(3));

        let record = record.with_usage(2, Some(at(5)));
        assert_eq!(record.last_activity(), at(5));
        assert_eq!(record.updated_or_created(), at(3));
    }

    #[test]
    fn test_unscored_result_omits_annotations() {
        let result = SearchResult::unscored(Record::new("1", "A", "a", at(1)));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["id"], "1");
        assert_eq!(json["usageCount"], 0);
        assert!(json.get("searchScore").is_none());
        assert!(json.get("matchedIn").is_none());
    }

    #[test]
    fn test_scored_result_serializes_flat() {
        let result = SearchResult::scored(Record::new("1", "A", "a", at(1)), 0.9, MatchLocation::Tags);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["title"], "A");
        assert_eq!(json["searchScore"], 0.9);
        assert_eq!(json["matchedIn"], "tags");
    }
}

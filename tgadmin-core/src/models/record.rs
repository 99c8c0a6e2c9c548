//! Resource records and list results.
//!
//! Records are passed through as unstructured bags of fields. Only a few
//! accessors are typed: the identifier, the status string and timestamps.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::models::resource::page_count;

// ============================================================================
// Record
// ============================================================================

/// A backend resource record (user, bot, subscription, payment, plan).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Creates a record from a JSON object.
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Returns the opaque identifier.
    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    /// Returns the raw status string.
    pub fn status(&self) -> Option<&str> {
        self.str_field("status")
    }

    /// Returns a field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns a string field.
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Returns a boolean field.
    pub fn bool_field(&self, field: &str) -> Option<bool> {
        self.0.get(field).and_then(Value::as_bool)
    }

    /// Renders a field for display. Strings are unquoted, null and missing are empty.
    pub fn display_field(&self, field: &str) -> String {
        match self.0.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Parses a timestamp field.
    pub fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        self.str_field(field).and_then(parse_timestamp)
    }

    /// Returns the creation timestamp.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp("created_at")
    }

    /// Returns the last-update timestamp.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp("updated_at")
    }

    /// Case-insensitive substring match over all scalar fields.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.0.values().any(|value| match value {
            Value::String(s) => s.to_lowercase().contains(&needle),
            Value::Number(n) => n.to_string().contains(&needle),
            _ => false,
        })
    }

    /// Returns the underlying fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the record, returning the underlying fields.
    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Reads a record list from either a bare JSON array or an envelope object
/// holding one array field, such as `{"expiring_subscriptions": [...], "count": 2}`.
pub fn records_from_value(value: Value) -> Result<Vec<Record>, CoreError> {
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(map) => {
            let list = map
                .into_iter()
                .find_map(|(_, v)| v.is_array().then_some(v))
                .ok_or_else(|| CoreError::InvalidData("object holds no record list".to_string()))?;
            Ok(serde_json::from_value(list)?)
        }
        other => Err(CoreError::InvalidData(format!(
            "expected a record list, got {other}"
        ))),
    }
}

/// Parses RFC 3339 timestamps, or naive ISO-8601 timestamps as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

// ============================================================================
// Page
// ============================================================================

/// One page of a paginated list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Records on this page, in backend order.
    #[serde(default)]
    pub items: Vec<Record>,
    /// Total number of records across all pages.
    #[serde(default)]
    pub total: u64,
    /// Page number echoed by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Page size echoed by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    /// Page count echoed by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
}

impl Page {
    /// Wraps an unpaginated list as a single page.
    pub fn from_items(items: Vec<Record>) -> Self {
        let total = items.len() as u64;
        Self {
            items,
            total,
            page: None,
            size: None,
            pages: None,
        }
    }

    /// Returns true if this page has no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Computes the page count for the given page size.
    pub fn page_count(&self, page_size: u32) -> u32 {
        page_count(self.total, page_size)
    }

    /// Finds a record by id.
    pub fn find(&self, id: &str) -> Option<&Record> {
        self.items.iter().find(|r| r.id() == Some(id))
    }
}

// ============================================================================
// Auth
// ============================================================================

/// Token returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Bearer token.
    pub access_token: String,
    /// Token type, always "bearer".
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_record_accessors() {
        let r = record(json!({
            "id": "b-1",
            "status": "running",
            "bot_name": "Alpha",
            "is_healthy": true,
            "admin_numeric_id": 42,
            "container_id": null
        }));

        assert_eq!(r.id(), Some("b-1"));
        assert_eq!(r.status(), Some("running"));
        assert_eq!(r.bool_field("is_healthy"), Some(true));
        assert_eq!(r.display_field("admin_numeric_id"), "42");
        assert_eq!(r.display_field("container_id"), "");
        assert_eq!(r.display_field("missing"), "");
    }

    #[test]
    fn test_parse_timestamps() {
        let aware = parse_timestamp("2024-03-01T12:00:00Z").unwrap();
        let naive = parse_timestamp("2024-03-01T12:00:00.123456").unwrap();
        assert_eq!(aware.timestamp(), naive.timestamp());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_matches_search() {
        let r = record(json!({"id": "u-7", "username": "Alice", "telegram_user_id": 5551234}));
        assert!(r.matches_search("alice"));
        assert!(r.matches_search("555"));
        assert!(r.matches_search("  "));
        assert!(!r.matches_search("bob"));
    }

    #[test]
    fn test_page_deserialize_paginated_response() {
        let page: Page = serde_json::from_value(json!({
            "items": [{"id": "a"}, {"id": "b"}],
            "total": 23,
            "page": 1,
            "size": 10,
            "pages": 3
        }))
        .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.page_count(10), 3);
        assert!(page.find("b").is_some());
        assert!(page.find("z").is_none());
    }

    #[test]
    fn test_page_from_items() {
        let page = Page::from_items(vec![Record::default(), Record::default()]);
        assert_eq!(page.total, 2);
        assert!(page.page.is_none());
    }

    #[test]
    fn test_token_type_default() {
        let token: TokenResponse = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(token.token_type, "bearer");
    }

    #[test]
    fn test_records_from_envelope() {
        let bare = records_from_value(json!([{ "id": "s1" }])).unwrap();
        assert_eq!(bare.len(), 1);

        let wrapped = records_from_value(json!({
            "expiring_subscriptions": [{ "id": "s1" }, { "id": "s2" }],
            "count": 2,
            "days": 7
        }))
        .unwrap();
        assert_eq!(wrapped.len(), 2);
        assert_eq!(wrapped[1].id(), Some("s2"));

        assert!(records_from_value(json!({ "count": 0 })).is_err());
        assert!(records_from_value(json!("nope")).is_err());
    }
}

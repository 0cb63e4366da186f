//! Rows and row identity.
//!
//! A [`Row`] is an opaque record: a mapping from field name to [`Value`].
//! The engine never interprets fields beyond dot-path resolution and the
//! identity rules below; row data is owned and refreshed by the caller.
//!
//! # Identity
//!
//! Selection must survive filtering, sorting, pagination, and wholesale row
//! replacement, so it is keyed by [`RowKey`] rather than by position or
//! reference: the stringified `id` field when the row has one, otherwise a
//! stable digest of the row's content. Callers that select rows without `id`
//! fields should keep row content stable between refreshes.

use std::collections::BTreeMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::value::{NULL, Value};

/// One record displayed as a table line.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: BTreeMap<String, Value>,
}

impl Row {
    /// Creates an empty row. Every path resolves absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a row from a field mapping.
    pub fn from_fields(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }

    /// Builder-style field insertion, mainly for tests and examples.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns the top-level field for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns the row's `id` field, if present and non-null.
    pub fn id(&self) -> Option<&Value> {
        self.fields.get("id").filter(|v| !v.is_null())
    }

    /// Resolves a dot-separated path into the row.
    ///
    /// Missing segments resolve to `Value::Null`, matching
    /// [`Value::resolve`].
    pub fn resolve(&self, path: &str) -> &Value {
        let (first, rest) = match path.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (path, None),
        };
        let Some(value) = self.fields.get(first) else {
            return &NULL;
        };
        match rest {
            Some(rest) => value.resolve(rest),
            None => value,
        }
    }

    /// Returns the identity key used for selection tracking.
    pub fn key(&self) -> RowKey {
        match self.id() {
            Some(id) => RowKey::Id(id.to_text()),
            None => RowKey::Digest(self.digest()),
        }
    }

    /// Stable content digest for rows without an `id` field.
    fn digest(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.fields.len().hash(&mut hasher);
        for (key, value) in &self.fields {
            key.hash(&mut hasher);
            value.hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// The stable identity of a row across recomputations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowKey {
    /// Stringified `id` field.
    Id(String),
    /// Content digest of a row with no `id` field.
    Digest(u64),
}

/// Coerces arbitrary input into a row sequence.
///
/// Lists normalize element-wise: record elements become rows, anything else
/// becomes an empty row. Any non-list input yields an empty sequence; this
/// never fails.
pub fn rows_from_value(input: &Value) -> Vec<Row> {
    let Some(items) = input.as_list() else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| match item.as_record() {
            Some(fields) => Row::from_fields(fields.clone()),
            None => Row::new(),
        })
        .collect()
}

/// Convenience normalizer for callers holding `serde_json` data.
pub fn rows_from_json(input: serde_json::Value) -> Vec<Row> {
    rows_from_value(&Value::from(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalizer_accepts_record_list() {
        let rows = rows_from_json(json!([
            { "id": 1, "name": "Ann" },
            { "id": 2, "name": "Bo" },
        ]));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].resolve("name").as_str(), Some("Ann"));
    }

    #[test]
    fn test_normalizer_rejects_non_sequence() {
        assert!(rows_from_json(json!({ "rows": [] })).is_empty());
        assert!(rows_from_json(json!("not rows")).is_empty());
        assert!(rows_from_json(json!(null)).is_empty());
        assert!(rows_from_json(json!(42)).is_empty());
    }

    #[test]
    fn test_normalizer_blanks_non_record_elements() {
        let rows = rows_from_json(json!([{ "id": 1 }, "stray", 7]));

        assert_eq!(rows.len(), 3);
        assert!(rows[1].resolve("id").is_null());
        assert!(rows[2].resolve("anything").is_null());
    }

    #[test]
    fn test_key_uses_id_field() {
        let row = Row::new().with_field("id", 42).with_field("name", "Ann");
        assert_eq!(row.key(), RowKey::Id("42".to_string()));

        // A different spelling of the same id still matches: keys compare by
        // stringified form.
        let row2 = Row::new().with_field("id", "42");
        assert_eq!(row.key(), row2.key());
    }

    #[test]
    fn test_key_digest_is_content_stable() {
        let a = Row::new().with_field("name", "Ann").with_field("age", 30);
        let b = Row::new().with_field("age", 30).with_field("name", "Ann");
        let c = Row::new().with_field("name", "Bo").with_field("age", 30);

        // Field order does not matter; content does.
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
        assert!(matches!(a.key(), RowKey::Digest(_)));
    }

    #[test]
    fn test_null_id_falls_back_to_digest() {
        let row = Row::new().with_field("id", Value::Null).with_field("n", 1);
        assert!(matches!(row.key(), RowKey::Digest(_)));
    }
}

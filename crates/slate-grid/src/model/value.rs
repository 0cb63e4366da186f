//! Dynamic cell values for grid rows.
//!
//! Rows arrive from page-level callers as loosely shaped data (typically
//! deserialized JSON), so cells are dynamically typed. [`Value`] is the
//! container for one such datum and provides the three operations the
//! pipeline is built on:
//!
//! - [`resolve`](Value::resolve): dot-path traversal into nested records
//! - [`to_text`](Value::to_text): stringification for matching and export
//! - [`total_cmp`](Value::total_cmp): a documented total order for sorting
//!
//! # Example
//!
//! ```
//! use slate_grid::model::Value;
//!
//! let student: Value = serde_json::json!({
//!     "profile": { "firstName": "Ann" },
//!     "age": 30,
//! }).into();
//!
//! assert_eq!(student.resolve("profile.firstName").to_text(), "Ann");
//! assert_eq!(student.resolve("profile.missing").to_text(), "");
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Sentinel returned by path resolution when a segment is absent.
pub(crate) static NULL: Value = Value::Null;

/// Record fields preferred by [`Value::label`], in order.
const LABEL_FIELDS: [&str; 4] = ["name", "title", "label", "username"];

/// A dynamically typed cell value.
///
/// `Value` mirrors the JSON data model: scalars, lists, and string-keyed
/// records. Records use a `BTreeMap` so that serialization (and therefore the
/// identity digest computed over it) is canonical.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// No value. Absent paths resolve to this.
    #[default]
    Null,
    /// Boolean data.
    Bool(bool),
    /// Integer data.
    Int(i64),
    /// Floating point data.
    Float(f64),
    /// String data.
    String(String),
    /// A sequence of values.
    List(Vec<Value>),
    /// A string-keyed mapping of values.
    Record(BTreeMap<String, Value>),
}

impl Value {
    /// Returns `true` if this is `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Attempts to get the value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to get the value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to get the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to get the value as a float, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to get the record fields.
    pub fn as_record(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Attempts to get the list elements.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Resolves a dot-separated path into nested records.
    ///
    /// Any absent segment, or a traversal through a non-record value, yields
    /// `Value::Null` rather than an error.
    pub fn resolve(&self, path: &str) -> &Value {
        let mut current = self;
        for segment in path.split('.') {
            match current {
                Value::Record(fields) => match fields.get(segment) {
                    Some(value) => current = value,
                    None => return &NULL,
                },
                _ => return &NULL,
            }
        }
        current
    }

    /// Stringifies the value for substring matching and CSV export.
    ///
    /// `Null` becomes the empty string; scalars use their natural display
    /// form; lists and records use their compact JSON form.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::List(_) | Value::Record(_) => {
                serde_json::to_string(self).unwrap_or_default()
            }
        }
    }

    /// Coerces any value into a short human-readable label.
    ///
    /// Strings pass through; lists join their labeled elements; records
    /// prefer a `name`/`title`/`label`/`username` field, then `id`, then the
    /// stringified form. This is the fallback shown when a caller-supplied
    /// render function fails.
    pub fn label(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::List(items) => items
                .iter()
                .map(Value::label)
                .collect::<Vec<_>>()
                .join(", "),
            Value::Record(fields) => {
                for key in LABEL_FIELDS {
                    if let Some(value) = fields.get(key)
                        && !value.is_null()
                    {
                        return value.label();
                    }
                }
                if let Some(id) = fields.get("id")
                    && !id.is_null()
                {
                    return id.to_text();
                }
                self.to_text()
            }
            _ => self.to_text(),
        }
    }

    /// Rank used to order values of different types.
    fn type_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::String(_) => 3,
            Value::List(_) => 4,
            Value::Record(_) => 5,
        }
    }

    /// Compares two values under the engine's total order.
    ///
    /// Type rank first (`Null < Bool < numbers < String < List < Record`),
    /// then value within rank. `Int` and `Float` compare numerically against
    /// each other via `f64::total_cmp`, strings lexicographically, lists and
    /// records by their textual form. Heterogeneous columns therefore sort
    /// deterministically instead of inheriting coercion accidents.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        if let (Some(a), Some(b)) = (self.as_f64(), other.as_f64()) {
            return a.total_cmp(&b);
        }
        match self.type_rank().cmp(&other.type_rank()) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            _ => self.to_text().cmp(&other.to_text()),
        }
    }
}

// Float variants make a derived Hash impossible; hash the bit pattern so the
// row identity digest stays stable across recomputations.
impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(n) => n.hash(state),
            Value::Float(n) => n.to_bits().hash(state),
            Value::String(s) => s.hash(state),
            Value::List(items) => {
                items.len().hash(state);
                for item in items {
                    item.hash(state);
                }
            }
            Value::Record(fields) => {
                fields.len().hash(state);
                for (key, value) in fields {
                    key.hash(state);
                    value.hash(state);
                }
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Value::Record(fields)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Record(
                map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

//! The canonical record envelope exchanged between stages.

use std::fmt;

use serde_json::{Map, Value};

/// Well-known field names inside structured records.
pub mod keys {
    pub const META: &str = "meta";
    pub const ANALYSIS: &str = "analysis";
    pub const TYPE: &str = "type";
    pub const SENSOR: &str = "sensor";
    pub const VALUE: &str = "value";
    pub const UNIT: &str = "unit";
    pub const FINAL: &str = "final";
    pub const ROWS: &str = "rows";

    pub const CHAINING: &str = "chaining";
    pub const SAFE_MODE: &str = "safe_mode";
    pub const TIMESTAMP: &str = "timestamp";

    pub const STATUS: &str = "status";
    pub const READING: &str = "reading";
    pub const ACTIONS: &str = "actions";
    pub const COUNT: &str = "count";
    pub const AVG: &str = "avg";
    pub const SUMMARY: &str = "summary";

    pub const CSV_TYPE: &str = "csv";
    pub const TEMP_SENSOR: &str = "temp";
}

/// A value flowing through a pipeline.
///
/// `Structured` and `Sequence` are the two canonical shapes. `Text` covers
/// both raw encoded input and the terminal formatted string produced by the
/// output stage. `Null` and `Scalar` exist so any caller-supplied value can be
/// represented and rejected with a precise error.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Null,
    Structured(Map<String, Value>),
    Sequence(Vec<Value>),
    Text(String),
    Scalar(Value),
}

/// Discriminant computed once from a record's shape and tagged fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Structured record with `type == "csv"`.
    Csv,
    /// Structured record with `sensor == "temp"`.
    SensorTemp,
    /// Structured record carrying a `value` field.
    GenericValue,
    /// Structured record with none of the above signals.
    Generic,
    Sequence,
    Text,
    Null,
    Scalar,
}

impl Record {
    /// Empty structured record.
    pub fn structured() -> Self {
        Self::Structured(Map::new())
    }

    /// Classifies the record. Tag priority: csv, temperature sensor, value.
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Structured(map) => {
                if map.get(keys::TYPE).and_then(Value::as_str) == Some(keys::CSV_TYPE) {
                    RecordKind::Csv
                } else if map.get(keys::SENSOR).and_then(Value::as_str) == Some(keys::TEMP_SENSOR)
                {
                    RecordKind::SensorTemp
                } else if map.contains_key(keys::VALUE) {
                    RecordKind::GenericValue
                } else {
                    RecordKind::Generic
                }
            }
            Self::Sequence(_) => RecordKind::Sequence,
            Self::Text(_) => RecordKind::Text,
            Self::Null => RecordKind::Null,
            Self::Scalar(_) => RecordKind::Scalar,
        }
    }

    /// Short shape name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Structured(_) => "mapping",
            Self::Sequence(_) => "sequence",
            Self::Text(_) => "text",
            Self::Scalar(Value::Bool(_)) => "boolean",
            Self::Scalar(Value::Number(_)) => "number",
            Self::Scalar(_) => "scalar",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_structured(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Structured(map) => Some(map),
            _ => None,
        }
    }

    /// Top-level field of a structured record.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.as_structured().and_then(|map| map.get(key))
    }

    /// The `meta` mapping, if present and well-formed.
    pub fn meta(&self) -> Option<&Map<String, Value>> {
        self.field(keys::META).and_then(Value::as_object)
    }

    pub fn meta_mut(&mut self) -> Option<&mut Map<String, Value>> {
        match self {
            Self::Structured(map) => map.get_mut(keys::META).and_then(Value::as_object_mut),
            _ => None,
        }
    }

    /// The `analysis` mapping, if present and well-formed.
    pub fn analysis(&self) -> Option<&Map<String, Value>> {
        self.field(keys::ANALYSIS).and_then(Value::as_object)
    }

    /// True when an intermediate chain hop must defer output formatting.
    pub fn is_chaining(&self) -> bool {
        self.meta()
            .and_then(|meta| meta.get(keys::CHAINING))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Marks a structured record as travelling through a chain.
    ///
    /// A missing `meta` is created. Returns false when the record is not
    /// structured or its `meta` is not a mapping, leaving it untouched.
    pub fn mark_chaining(&mut self) -> bool {
        let Self::Structured(map) = self else {
            return false;
        };
        let meta = map
            .entry(keys::META)
            .or_insert_with(|| Value::Object(Map::new()));
        match meta.as_object_mut() {
            Some(meta) => {
                meta.insert(keys::CHAINING.to_string(), Value::Bool(true));
                true
            }
            None => false,
        }
    }

    /// Removes the transient chaining marker, if any.
    pub fn clear_chaining(&mut self) {
        if let Some(meta) = self.meta_mut() {
            meta.remove(keys::CHAINING);
        }
    }

    /// Converts back into a plain JSON value.
    pub fn into_value(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Structured(map) => Value::Object(map),
            Self::Sequence(items) => Value::Array(items),
            Self::Text(text) => Value::String(text),
            Self::Scalar(value) => value,
        }
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Object(map) => Self::Structured(map),
            Value::Array(items) => Self::Sequence(items),
            Value::String(text) => Self::Text(text),
            other => Self::Scalar(other),
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self::Structured(map)
    }
}

impl From<Vec<Value>> for Record {
    fn from(items: Vec<Value>) -> Self {
        Self::Sequence(items)
    }
}

impl From<&str> for Record {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Record {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Text renders verbatim; every other shape renders as JSON.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Text(text) => f.write_str(text),
            Self::Scalar(value) => write!(f, "{value}"),
            Self::Structured(map) => write!(f, "{}", Value::Object(map.clone())),
            Self::Sequence(items) => write!(f, "{}", Value::Array(items.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record {
        Record::from(value)
    }

    #[test]
    fn kind_follows_tag_priority() {
        assert_eq!(
            record(json!({"type": "csv", "sensor": "temp", "value": 1})).kind(),
            RecordKind::Csv
        );
        assert_eq!(
            record(json!({"sensor": "temp", "value": 1})).kind(),
            RecordKind::SensorTemp
        );
        assert_eq!(
            record(json!({"sensor": "humidity", "value": 1})).kind(),
            RecordKind::GenericValue
        );
        assert_eq!(record(json!({"value": null})).kind(), RecordKind::GenericValue);
        assert_eq!(record(json!({"name": "x"})).kind(), RecordKind::Generic);
        assert_eq!(record(json!([1, 2])).kind(), RecordKind::Sequence);
        assert_eq!(record(json!("text")).kind(), RecordKind::Text);
        assert_eq!(record(Value::Null).kind(), RecordKind::Null);
        assert_eq!(record(json!(4)).kind(), RecordKind::Scalar);
    }

    #[test]
    fn chaining_marker_round_trip() {
        let mut rec = record(json!({"sensor": "temp"}));
        assert!(!rec.is_chaining());
        assert!(rec.mark_chaining());
        assert!(rec.is_chaining());
        rec.clear_chaining();
        assert!(!rec.is_chaining());
        assert_eq!(rec.meta().map(Map::len), Some(0));
    }

    #[test]
    fn chaining_marker_skips_malformed_meta() {
        let mut rec = record(json!({"meta": "oops"}));
        assert!(!rec.mark_chaining());
        assert_eq!(rec.field("meta"), Some(&json!("oops")));

        let mut seq = record(json!([1]));
        assert!(!seq.mark_chaining());
    }

    #[test]
    fn display_renders_text_verbatim() {
        assert_eq!(Record::from("hello").to_string(), "hello");
        assert_eq!(record(json!({"a": 1})).to_string(), r#"{"a":1}"#);
        assert_eq!(record(json!(2.5)).to_string(), "2.5");
    }
}

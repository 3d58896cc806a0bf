use std::ops::RangeInclusive;

use chrono::Utc;
use nexus_model::{
    Record, RecordKind, StageError, StageKind, format_numeric, keys, numeric_value, parse_f64,
};
use serde_json::{Map, Value};

use super::Stage;

const STAGE: StageKind = StageKind::Transform;

/// Celsius readings inside this range are reported as normal.
pub const CELSIUS_RANGE: RangeInclusive<f64> = 0.0..=35.0;

const DEFAULT_UNIT: &str = "C";

const STATUS_CSV: &str = "CSV parsed";
const STATUS_ENRICHED: &str = "Enriched with metadata";
const STATUS_NORMAL: &str = "Normal range";
const STATUS_OUT_OF_RANGE: &str = "Out of range";
const STATUS_INVALID_FORMAT: &str = "Invalid data format";
const STATUS_INVALID_VALUE: &str = "Invalid value";
const READING_UNAVAILABLE: &str = "N/A";
const SUMMARY_EMPTY: &str = "Empty stream";

/// Enriches structured records and aggregates sequences.
///
/// Structured records are stamped with `meta.timestamp` and receive an
/// `analysis` mapping whose content depends on the [`RecordKind`]. When
/// `meta.safe_mode` is true, unparsable numeric fields become a status
/// annotation instead of an error. Sequences collapse into a terminal
/// `{analysis: {count, avg}, final: true}` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformStage;

impl Stage for TransformStage {
    fn kind(&self) -> StageKind {
        STAGE
    }

    fn name(&self) -> &str {
        "TransformStage"
    }

    fn process(&self, record: Record) -> Result<Record, StageError> {
        let kind = record.kind();
        match record {
            Record::Structured(map) => enrich(map, kind).map(Record::Structured),
            Record::Sequence(items) => aggregate(&items),
            other => Err(StageError::UnsupportedType {
                stage: STAGE,
                found: other.type_name(),
            }),
        }
    }
}

fn enrich(mut map: Map<String, Value>, kind: RecordKind) -> Result<Map<String, Value>, StageError> {
    let mut meta = take_meta(&mut map)?;
    let mut analysis = take_analysis(&mut map);
    let safe_mode = meta
        .get(keys::SAFE_MODE)
        .and_then(Value::as_bool)
        .unwrap_or(false);

    match kind {
        RecordKind::Csv => {
            set_default_status(&mut analysis, STATUS_CSV);
        }
        RecordKind::SensorTemp => match map.get(keys::VALUE).and_then(parse_f64) {
            Some(value) => analysis = temperature_analysis(value, &unit_of(&map)),
            None if safe_mode => {
                set_text(&mut analysis, keys::READING, READING_UNAVAILABLE);
                set_text(&mut analysis, keys::STATUS, STATUS_INVALID_FORMAT);
            }
            None => return Err(StageError::InvalidDataFormat { stage: STAGE }),
        },
        RecordKind::GenericValue => match map.get(keys::VALUE).and_then(parse_f64) {
            Some(_) => set_default_status(&mut analysis, STATUS_ENRICHED),
            None if safe_mode => set_text(&mut analysis, keys::STATUS, STATUS_INVALID_VALUE),
            None => return Err(StageError::InvalidDataFormat { stage: STAGE }),
        },
        _ => set_default_status(&mut analysis, STATUS_ENRICHED),
    }

    meta.insert(keys::TIMESTAMP.to_string(), Value::from(unix_timestamp()));
    map.insert(keys::META.to_string(), Value::Object(meta));
    map.insert(keys::ANALYSIS.to_string(), Value::Object(analysis));
    Ok(map)
}

fn aggregate(items: &[Value]) -> Result<Record, StageError> {
    if items.is_empty() {
        let mut analysis = Map::new();
        set_text(&mut analysis, keys::SUMMARY, SUMMARY_EMPTY);
        return Ok(terminal(analysis));
    }

    let values: Vec<f64> = items.iter().filter_map(numeric_item).collect();
    if values.is_empty() {
        return Err(StageError::NoNumericValues { stage: STAGE });
    }

    let avg = values.iter().sum::<f64>() / values.len() as f64;
    let mut analysis = Map::new();
    analysis.insert(keys::COUNT.to_string(), Value::from(values.len()));
    analysis.insert(keys::AVG.to_string(), numeric_value(avg));
    Ok(terminal(analysis))
}

/// Numbers count directly; mappings contribute their `value` when it parses.
fn numeric_item(item: &Value) -> Option<f64> {
    match item {
        Value::Number(number) => number.as_f64(),
        Value::Object(fields) => fields.get(keys::VALUE).and_then(parse_f64),
        _ => None,
    }
}

fn terminal(analysis: Map<String, Value>) -> Record {
    let mut map = Map::new();
    map.insert(keys::ANALYSIS.to_string(), Value::Object(analysis));
    map.insert(keys::FINAL.to_string(), Value::Bool(true));
    Record::Structured(map)
}

fn temperature_analysis(value: f64, unit: &str) -> Map<String, Value> {
    let out_of_range = value < *CELSIUS_RANGE.start() || value > *CELSIUS_RANGE.end();
    let status = if unit == DEFAULT_UNIT && out_of_range {
        STATUS_OUT_OF_RANGE
    } else {
        STATUS_NORMAL
    };
    let mut analysis = Map::new();
    analysis.insert(
        keys::READING.to_string(),
        Value::String(format!("{}°{unit}", format_numeric(value))),
    );
    set_text(&mut analysis, keys::STATUS, status);
    analysis
}

fn unit_of(map: &Map<String, Value>) -> String {
    match map.get(keys::UNIT) {
        None | Some(Value::Null) => DEFAULT_UNIT.to_string(),
        Some(Value::String(unit)) => unit.clone(),
        Some(other) => other.to_string(),
    }
}

fn take_meta(map: &mut Map<String, Value>) -> Result<Map<String, Value>, StageError> {
    match map.remove(keys::META) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(meta)) => Ok(meta),
        Some(_) => Err(StageError::MetaNotMapping { stage: STAGE }),
    }
}

/// A malformed `analysis` is replaced rather than rejected.
fn take_analysis(map: &mut Map<String, Value>) -> Map<String, Value> {
    match map.remove(keys::ANALYSIS) {
        Some(Value::Object(analysis)) => analysis,
        _ => Map::new(),
    }
}

fn set_text(analysis: &mut Map<String, Value>, key: &str, text: &str) {
    analysis.insert(key.to_string(), Value::String(text.to_string()));
}

fn set_default_status(analysis: &mut Map<String, Value>, status: &str) {
    analysis
        .entry(keys::STATUS)
        .or_insert_with(|| Value::String(status.to_string()));
}

/// Fractional Unix seconds.
fn unix_timestamp() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

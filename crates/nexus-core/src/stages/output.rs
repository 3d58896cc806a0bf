use nexus_model::{Record, RecordKind, StageError, StageKind, format_numeric, keys, parse_f64};
use serde_json::{Map, Value};

use super::Stage;

/// Formats a terminal human-readable string.
///
/// Records marked with `meta.chaining` pass through untouched so the next
/// pipeline in a chain receives the structured record.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputStage;

impl OutputStage {
    /// Formats `record`. Never fails; unknown shapes render generically.
    pub fn format(&self, record: Record) -> Record {
        if record.is_chaining() {
            return record;
        }
        let text = match record.kind() {
            RecordKind::Csv => format!(
                "User activity logged: {} actions processed",
                action_count(&record)
            ),
            RecordKind::SensorTemp => {
                let analysis = record.analysis();
                format!(
                    "Processed temperature reading: {} ({})",
                    analysis_text(analysis, keys::READING),
                    analysis_text(analysis, keys::STATUS)
                )
            }
            RecordKind::GenericValue | RecordKind::Generic => {
                let analysis = record.analysis().cloned().unwrap_or_default();
                stream_summary(&analysis)
                    .unwrap_or_else(|| format!("Output: {}", Value::Object(analysis)))
            }
            RecordKind::Sequence => match &record {
                Record::Sequence(items) => format!("Output list: {} items", items.len()),
                _ => format!("Output: {record}"),
            },
            RecordKind::Text | RecordKind::Null | RecordKind::Scalar => {
                format!("Output: {record}")
            }
        };
        Record::Text(text)
    }
}

impl Stage for OutputStage {
    fn kind(&self) -> StageKind {
        StageKind::Output
    }

    fn name(&self) -> &str {
        "OutputStage"
    }

    fn process(&self, record: Record) -> Result<Record, StageError> {
        Ok(self.format(record))
    }
}

fn action_count(record: &Record) -> i64 {
    record
        .analysis()
        .and_then(|analysis| analysis.get(keys::ACTIONS))
        .and_then(parse_f64)
        .map_or(0, |actions| actions.trunc() as i64)
}

fn analysis_text(analysis: Option<&Map<String, Value>>, key: &str) -> String {
    match analysis.and_then(|analysis| analysis.get(key)) {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => "unknown".to_string(),
    }
}

fn stream_summary(analysis: &Map<String, Value>) -> Option<String> {
    let count = analysis.get(keys::COUNT)?;
    let avg = analysis.get(keys::AVG)?;
    let avg = match parse_f64(avg) {
        Some(avg) if avg.is_finite() => format!("{avg:.1}"),
        Some(avg) => format_numeric(avg),
        None => avg.to_string(),
    };
    Some(format!("Stream summary: {count} readings, avg: {avg}°C"))
}

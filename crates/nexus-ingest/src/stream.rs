use serde_json::{Value, json};

/// Readings produced when a stream pipeline receives its text sentinel.
pub const SAMPLE_READINGS: [f64; 3] = [22.0, 22.3, 22.1];

/// Built-in sample sequence: one `{"value": reading}` record per sample.
pub fn sample_stream() -> Vec<Value> {
    SAMPLE_READINGS
        .iter()
        .map(|reading| json!({ "value": reading }))
        .collect()
}

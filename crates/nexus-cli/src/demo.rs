//! The reference walkthrough: three input formats, a chain, and failover.

use nexus_core::{PipelineManager, Result};
use nexus_model::Record;
use serde_json::json;

pub const SENSOR_INPUT: &str = r#"{"sensor":"temp","value":23.5,"unit":"C"}"#;
pub const CSV_INPUT: &str = "user,action,timestamp\n";
pub const STREAM_INPUT: &str = "Real-time sensor stream";
pub const MALFORMED_SENSOR_INPUT: &str = r#"{"sensor":"temp","value":"NOT_A_NUMBER","unit":"C"}"#;
pub const CHAIN: [&str; 3] = ["JSON_PIPE", "JSON_PIPE", "JSON_PIPE"];

/// Run the walkthrough against `manager` and return the transcript lines.
///
/// The manager must register `JSON_PIPE`, `CSV_PIPE` and `STREAM_PIPE`; the
/// recovery step only succeeds when `JSON_PIPE` has a safe-mode backup.
///
/// # Errors
///
/// Returns the first pipeline failure.
pub fn run_demo(manager: &mut PipelineManager) -> Result<Vec<String>> {
    let mut lines = vec![
        "=== CODE NEXUS - ENTERPRISE PIPELINE SYSTEM ===".to_string(),
        String::new(),
        "Initializing Nexus Manager...".to_string(),
        format!(
            "Pipeline capacity: {} streams/second",
            manager.options().capacity_per_sec
        ),
        String::new(),
        "Creating Data Processing Pipeline...".to_string(),
        "Stage 1: Input validation and parsing".to_string(),
        "Stage 2: Data transformation and enrichment".to_string(),
        "Stage 3: Output formatting and delivery".to_string(),
        String::new(),
        "=== Multi-Format Data Processing ===".to_string(),
        String::new(),
    ];

    let output = manager.execute("JSON_PIPE", Record::from(SENSOR_INPUT))?;
    lines.push("Processing JSON data through pipeline...".to_string());
    lines.push(format!("Input: {SENSOR_INPUT}"));
    lines.push(format!("Output: {output}"));
    lines.push(String::new());

    let output = manager.execute("CSV_PIPE", Record::from(CSV_INPUT))?;
    lines.push("Processing CSV data through same pipeline...".to_string());
    lines.push(format!("Input: {CSV_INPUT:?}"));
    lines.push(format!("Output: {output}"));
    lines.push(String::new());

    let output = manager.execute("STREAM_PIPE", Record::from(STREAM_INPUT))?;
    lines.push("Processing Stream data through same pipeline...".to_string());
    lines.push(format!("Input: {STREAM_INPUT}"));
    lines.push(format!("Output: {output}"));
    lines.push(String::new());

    let start = Record::from(json!({"sensor": "temp", "value": 23.5, "unit": "C"}));
    let output = manager.chain(&CHAIN, start)?;
    lines.push("=== Pipeline Chaining Demo ===".to_string());
    lines.push("Pipeline A -> Pipeline B -> Pipeline C".to_string());
    lines.push(format!("Chain result: {output}"));
    lines.push(String::new());

    lines.push("=== Error Recovery Test ===".to_string());
    lines.push(String::new());
    lines.push("Simulating pipeline failure...".to_string());
    let output = manager.execute("JSON_PIPE", Record::from(MALFORMED_SENSOR_INPUT))?;
    lines.push(output.to_string());
    lines.push(String::new());
    lines.push("Nexus Integration complete. All systems operational.".to_string());

    Ok(lines)
}

//! Tests for the JSON, CSV and Stream adapters.

use std::sync::Arc;

use nexus_core::{
    AdapterError, AdapterKind, CsvAdapter, JsonAdapter, OutputStage, Pipeline, PipelineError,
    StreamAdapter,
};
use nexus_model::{Record, SafeMode, StageKind};
use serde_json::json;

const SENSOR_JSON: &str = r#"{"sensor":"temp","value":23.5,"unit":"C"}"#;
const BAD_SENSOR_JSON: &str = r#"{"sensor":"temp","value":"NOT_A_NUMBER","unit":"C"}"#;

fn adapter_source(err: &PipelineError) -> &AdapterError {
    match err {
        PipelineError::Adapter { source, .. } => source,
        other => panic!("expected adapter failure, got {other}"),
    }
}

#[test]
fn json_adapter_formats_temperature_text() {
    let mut pipeline = JsonAdapter::new("JSON_PIPE").with_default_stages();

    let out = pipeline.process(Record::from(SENSOR_JSON)).unwrap();

    assert_eq!(
        out.as_text(),
        Some("Processed temperature reading: 23.5°C (Normal range)")
    );
    let stats = pipeline.stats();
    assert_eq!((stats.processed, stats.errors), (1, 0));
    assert_eq!(stats.adapter, "JSON");
}

#[test]
fn json_adapter_accepts_mappings() {
    let mut pipeline = JsonAdapter::new("JSON_PIPE").with_default_stages();

    let out = pipeline
        .process(Record::from(json!({"sensor": "temp", "value": 50})))
        .unwrap();

    assert_eq!(
        out.as_text(),
        Some("Processed temperature reading: 50.0°C (Out of range)")
    );
}

#[test]
fn json_adapter_marks_final_and_safe_mode() {
    let mut pipeline = JsonAdapter::new("RAW")
        .with_safe_mode(SafeMode::Enabled)
        .with_default_stages();
    pipeline.chain_mut().remove_stage("OutputStage");

    let out = pipeline.process(Record::from(json!({"value": 1}))).unwrap();

    assert_eq!(out.field("final"), Some(&json!(true)));
    assert_eq!(
        out.meta().and_then(|meta| meta.get("safe_mode")),
        Some(&json!(true))
    );
}

#[test]
fn json_adapter_safe_mode_follows_identifier_by_default() {
    assert!(JsonAdapter::new("JSON_BACKUP").safe_mode());
    assert!(!JsonAdapter::new("JSON_PIPE").safe_mode());
    assert!(
        !JsonAdapter::new("JSON_BACKUP")
            .with_safe_mode(SafeMode::Disabled)
            .safe_mode()
    );
}

#[test]
fn json_adapter_failure_names_adapter_and_stage() {
    let mut pipeline = JsonAdapter::new("JSON_PIPE").with_default_stages();

    let err = pipeline.process(Record::from(BAD_SENSOR_JSON)).unwrap_err();

    assert_eq!(
        err.to_string(),
        "JSON adapter failed in pipeline 'JSON_PIPE': transform stage: invalid data format"
    );
    assert_eq!(err.stage_error().map(|e| e.stage()), Some(StageKind::Transform));
    assert_eq!(pipeline.stats().errors, 1);
}

#[test]
fn json_backup_downgrades_invalid_values() {
    let mut backup = JsonAdapter::new("JSON_BACKUP").with_default_stages();

    let out = backup.process(Record::from(BAD_SENSOR_JSON)).unwrap();

    assert_eq!(
        out.as_text(),
        Some("Processed temperature reading: N/A (Invalid data format)")
    );
}

#[test]
fn json_adapter_rejects_other_shapes() {
    let mut pipeline = JsonAdapter::new("JSON_PIPE").with_default_stages();

    let err = pipeline.process(Record::from(json!([1, 2]))).unwrap_err();
    assert!(matches!(
        adapter_source(&err),
        AdapterError::ExpectsTextOrMapping { found: "sequence" }
    ));

    let err = pipeline.process(Record::from("[1, 2]")).unwrap_err();
    assert!(matches!(adapter_source(&err), AdapterError::Decode(_)));

    let err = pipeline.process(Record::from("{not json")).unwrap_err();
    assert!(err.to_string().contains("invalid json"));

    let err = pipeline
        .process(Record::from(json!({"meta": "oops"})))
        .unwrap_err();
    assert!(matches!(adapter_source(&err), AdapterError::MetaNotMapping));

    assert_eq!(pipeline.stats().errors, 4);
}

#[test]
fn csv_adapter_counts_header_only_as_one_action() {
    let mut pipeline = CsvAdapter::new("CSV_PIPE").with_default_stages();

    let out = pipeline
        .process(Record::from("user,action,timestamp\n"))
        .unwrap();

    assert_eq!(
        out.as_text(),
        Some("User activity logged: 1 actions processed")
    );
}

#[test]
fn csv_adapter_counts_rows() {
    let mut pipeline = CsvAdapter::new("CSV_PIPE").with_default_stages();

    let out = pipeline
        .process(Record::from(
            "user,action,timestamp\nalice,login,1\nbob,logout,2\ncarol,login,3\n",
        ))
        .unwrap();

    assert_eq!(
        out.as_text(),
        Some("User activity logged: 3 actions processed")
    );
}

#[test]
fn csv_adapter_builds_canonical_record() {
    let mut pipeline = CsvAdapter::new("CSV_PIPE")
        .with_stage(Arc::new(nexus_core::InputStage))
        .with_stage(Arc::new(nexus_core::TransformStage));

    let out = pipeline.process(Record::from("a,b\n1,2\n")).unwrap();

    assert_eq!(out.field("type"), Some(&json!("csv")));
    assert_eq!(out.field("rows"), Some(&json!([{"a": "1", "b": "2"}])));
    assert_eq!(
        out.analysis().map(|a| json!(a)),
        Some(json!({"actions": 1, "status": "CSV parsed"}))
    );
}

#[test]
fn csv_adapter_rejects_non_text() {
    let mut pipeline = CsvAdapter::new("CSV_PIPE").with_default_stages();

    let err = pipeline.process(Record::from(json!({"a": 1}))).unwrap_err();

    assert_eq!(
        err.to_string(),
        "CSV adapter failed in pipeline 'CSV_PIPE': expects text, found mapping"
    );
}

#[test]
fn stream_adapter_uses_sample_for_text() {
    let mut pipeline = StreamAdapter::new("STREAM_PIPE").with_default_stages();

    let out = pipeline
        .process(Record::from("Real-time sensor stream"))
        .unwrap();

    assert_eq!(
        out.as_text(),
        Some("Stream summary: 3 readings, avg: 22.1°C")
    );
}

#[test]
fn stream_adapter_aggregates_sequences() {
    let mut pipeline = StreamAdapter::new("STREAM_PIPE").with_default_stages();

    let out = pipeline
        .process(Record::from(json!([1, {"value": 2}, {"value": "x"}, 6])))
        .unwrap();

    assert_eq!(out.as_text(), Some("Stream summary: 3 readings, avg: 3.0°C"));
}

#[test]
fn stream_adapter_rejects_mappings() {
    let mut pipeline = StreamAdapter::new("STREAM_PIPE").with_default_stages();

    let err = pipeline.process(Record::from(json!({"value": 1}))).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Stream adapter failed in pipeline 'STREAM_PIPE': expects text or sequence, found mapping"
    );
    assert_eq!(pipeline.stats().efficiency, 0.0);
}

#[test]
fn adapters_report_kind_and_stages() {
    let pipelines: Vec<Box<dyn Pipeline>> = vec![
        Box::new(JsonAdapter::new("J").with_default_stages()),
        Box::new(CsvAdapter::new("C").with_stage(Arc::new(OutputStage))),
        Box::new(StreamAdapter::new("S")),
    ];

    let kinds: Vec<_> = pipelines.iter().map(|p| p.adapter()).collect();
    assert_eq!(
        kinds,
        vec![AdapterKind::Json, AdapterKind::Csv, AdapterKind::Stream]
    );
    let counts: Vec<_> = pipelines.iter().map(|p| p.stage_names().len()).collect();
    assert_eq!(counts, vec![3, 1, 0]);
}

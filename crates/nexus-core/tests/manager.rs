//! Tests for pipeline routing, backup failover and chaining.

use nexus_core::{
    CsvAdapter, JsonAdapter, NexusConfig, Pipeline, PipelineError, PipelineManager, StreamAdapter,
};
use nexus_model::{ManagerOptions, Record, SafeMode, StageKind};
use serde_json::json;

const SENSOR_JSON: &str = r#"{"sensor":"temp","value":23.5,"unit":"C"}"#;
const BAD_SENSOR_JSON: &str = r#"{"sensor":"temp","value":"NOT_A_NUMBER","unit":"C"}"#;

fn demo_manager() -> PipelineManager {
    NexusConfig::demo().build_manager().unwrap()
}

#[test]
fn demo_registry_registers_primaries_and_backup() {
    let manager = demo_manager();

    assert_eq!(
        manager.pipeline_ids(),
        vec!["CSV_PIPE", "JSON_PIPE", "STREAM_PIPE"]
    );
    assert!(manager.has_backup("JSON_PIPE"));
    assert_eq!(manager.backup_id("JSON_PIPE"), Some("JSON_BACKUP"));
    assert!(!manager.contains("JSON_BACKUP"));
    assert_eq!(manager.options().capacity_per_sec, 1000);
}

#[test]
fn execute_routes_by_identifier() {
    let mut manager = demo_manager();

    let json = manager.execute("JSON_PIPE", Record::from(SENSOR_JSON)).unwrap();
    let csv = manager
        .execute("CSV_PIPE", Record::from("user,action,timestamp\n"))
        .unwrap();
    let stream = manager
        .execute("STREAM_PIPE", Record::from("Real-time sensor stream"))
        .unwrap();

    assert_eq!(
        json.as_text(),
        Some("Processed temperature reading: 23.5°C (Normal range)")
    );
    assert_eq!(
        csv.as_text(),
        Some("User activity logged: 1 actions processed")
    );
    assert_eq!(
        stream.as_text(),
        Some("Stream summary: 3 readings, avg: 22.1°C")
    );
}

#[test]
fn execute_fails_over_to_backup() {
    let mut manager = demo_manager();

    let out = manager
        .execute("JSON_PIPE", Record::from(BAD_SENSOR_JSON))
        .unwrap();

    assert_eq!(
        out.as_text(),
        Some("Processed temperature reading: N/A (Invalid data format)")
    );
    let primary = manager.stats("JSON_PIPE").unwrap();
    assert_eq!((primary.processed, primary.errors), (0, 1));
    let backup = manager.backup_stats("JSON_PIPE").unwrap();
    assert_eq!((backup.processed, backup.errors), (1, 0));
}

#[test]
fn execute_without_backup_propagates_failure() {
    let mut manager = PipelineManager::new(ManagerOptions::default());
    manager.register(Box::new(JsonAdapter::new("JSON_PIPE").with_default_stages()));

    let err = manager
        .execute("JSON_PIPE", Record::from(BAD_SENSOR_JSON))
        .unwrap_err();

    assert!(err.to_string().contains("invalid data format"));
    assert_eq!(
        err.stage_error().map(|e| e.stage()),
        Some(StageKind::Transform)
    );
}

#[test]
fn backup_failure_propagates() {
    let mut manager = PipelineManager::new(ManagerOptions::default());
    manager.register(Box::new(JsonAdapter::new("JSON_PIPE").with_default_stages()));
    manager.register_backup(
        "JSON_PIPE",
        Box::new(
            JsonAdapter::new("STRICT_BACKUP")
                .with_safe_mode(SafeMode::Disabled)
                .with_default_stages(),
        ),
    );

    let err = manager
        .execute("JSON_PIPE", Record::from(BAD_SENSOR_JSON))
        .unwrap_err();

    assert!(err.to_string().contains("'STRICT_BACKUP'"));
    assert_eq!(manager.backup_stats("JSON_PIPE").unwrap().errors, 1);
}

#[test]
fn unknown_pipeline_never_consults_backup() {
    let mut manager = PipelineManager::new(ManagerOptions::default());
    manager.register_backup(
        "MISSING",
        Box::new(JsonAdapter::new("MISSING_BACKUP").with_default_stages()),
    );

    let err = manager
        .execute("MISSING", Record::from(SENSOR_JSON))
        .unwrap_err();

    assert!(matches!(err, PipelineError::UnknownPipeline(ref id) if id == "MISSING"));
    assert_eq!(err.to_string(), "unknown pipeline: MISSING");
    assert_eq!(manager.backup_stats("MISSING").unwrap().calls(), 0);
}

#[test]
fn register_replaces_existing_identifier() {
    let mut manager = PipelineManager::default();
    assert!(manager.register(Box::new(CsvAdapter::new("P"))).is_none());

    let replaced = manager.register(Box::new(StreamAdapter::new("P").with_default_stages()));

    assert!(replaced.is_some());
    assert_eq!(manager.len(), 1);
    assert_eq!(manager.pipeline("P").unwrap().stage_names().len(), 3);
}

#[test]
fn chain_of_three_json_hops_formats_once() {
    let mut manager = demo_manager();
    let start = Record::from(json!({"sensor": "temp", "value": 23.5, "unit": "C"}));

    let out = manager
        .chain(&["JSON_PIPE", "JSON_PIPE", "JSON_PIPE"], start)
        .unwrap();

    assert_eq!(
        out.as_text(),
        Some("Processed temperature reading: 23.5°C (Normal range)")
    );
    assert_eq!(manager.stats("JSON_PIPE").unwrap().processed, 3);
}

#[test]
fn chain_with_no_hops_formats_input() {
    let mut manager = demo_manager();
    let ids: [&str; 0] = [];

    let out = manager
        .chain(&ids, Record::from(json!({"type": "csv", "analysis": {"actions": 4}})))
        .unwrap();

    assert_eq!(
        out.as_text(),
        Some("User activity logged: 4 actions processed")
    );
}

#[test]
fn chain_wraps_terminal_text_once_more() {
    let mut manager = demo_manager();

    let out = manager
        .chain(&["STREAM_PIPE"], Record::from("Real-time sensor stream"))
        .unwrap();

    assert_eq!(
        out.as_text(),
        Some("Output: Stream summary: 3 readings, avg: 22.1°C")
    );
}

#[test]
fn chain_stops_at_unknown_hop() {
    let mut manager = demo_manager();

    let err = manager
        .chain(&["JSON_PIPE", "NOPE", "JSON_PIPE"], Record::from(SENSOR_JSON))
        .unwrap_err();

    assert!(err.is_unknown_pipeline());
    assert_eq!(manager.stats("JSON_PIPE").unwrap().processed, 1);
}

#[test]
fn chain_hops_use_backups() {
    let mut manager = demo_manager();

    let start = Record::from(json!({"sensor": "temp", "value": "NOT_A_NUMBER", "unit": "C"}));

    let out = manager.chain(&["JSON_PIPE", "JSON_PIPE"], start).unwrap();

    assert_eq!(
        out.as_text(),
        Some("Processed temperature reading: N/A (Invalid data format)")
    );
}

#[test]
fn stats_snapshot_tracks_stage_times() {
    let mut manager = demo_manager();
    let fresh = manager.stats("CSV_PIPE").unwrap();
    assert_eq!(fresh.efficiency, 1.0);
    assert!(fresh.stage_times.is_empty());

    manager
        .execute("CSV_PIPE", Record::from("a,b\n1,2\n"))
        .unwrap();
    manager
        .execute("CSV_PIPE", Record::from(json!([1])))
        .unwrap_err();

    let stats = manager.stats("CSV_PIPE").unwrap();
    assert_eq!(stats.id, "CSV_PIPE");
    assert_eq!(stats.adapter, "CSV");
    assert_eq!((stats.processed, stats.errors), (1, 1));
    assert_eq!(stats.efficiency, 0.5);
    assert_eq!(stats.stage_times.len(), 3);
    assert!(manager.stats("NOPE").is_none());
}

#[test]
fn all_stats_lists_primaries_then_backups() {
    let manager = demo_manager();

    let ids: Vec<_> = manager
        .all_stats()
        .into_iter()
        .map(|stats| stats.id)
        .collect();

    assert_eq!(ids, vec!["CSV_PIPE", "JSON_PIPE", "STREAM_PIPE", "JSON_BACKUP"]);
}

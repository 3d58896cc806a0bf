//! Tests for delimited-text decoding.

use nexus_ingest::{read_csv_text, sample_stream};
use serde_json::{Value, json};

#[test]
fn test_header_only_counts_one_action() {
    let table = read_csv_text("user,action,timestamp\n").unwrap();

    assert_eq!(table.headers, vec!["user", "action", "timestamp"]);
    assert!(table.rows.is_empty());
    assert_eq!(table.action_count(), 1);
}

#[test]
fn test_rows_are_keyed_by_header() {
    let text = "user,action,timestamp\nalice,login,10:00\nbob,logout,10:05\n";
    let table = read_csv_text(text).unwrap();

    assert_eq!(table.action_count(), 2);
    assert_eq!(table.rows[0].get("user"), Some(&json!("alice")));
    assert_eq!(table.rows[1].get("action"), Some(&json!("logout")));
}

#[test]
fn test_empty_text_has_no_header() {
    let table = read_csv_text("   \n").unwrap();

    assert!(!table.has_header());
    assert_eq!(table.action_count(), 0);
}

#[test]
fn test_short_rows_pad_with_null_and_long_rows_truncate() {
    let text = "a,b,c\n1\n1,2,3,4\n";
    let table = read_csv_text(text).unwrap();

    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].get("b"), Some(&Value::Null));
    assert_eq!(table.rows[1].len(), 3);
    assert_eq!(table.rows[1].get("c"), Some(&json!("3")));
}

#[test]
fn test_blank_lines_are_skipped() {
    let text = "a,b\n1,2\n\n3,4\n";
    let table = read_csv_text(text).unwrap();

    assert_eq!(table.action_count(), 2);
}

#[test]
fn test_header_byte_order_mark_is_stripped() {
    let table = read_csv_text("\u{feff}user,action\nx,y").unwrap();

    assert_eq!(table.headers[0], "user");
}

#[test]
fn test_rows_value_is_a_sequence_of_mappings() {
    let table = read_csv_text("a\n1\n2").unwrap();

    assert_eq!(table.rows_value(), json!([{"a": "1"}, {"a": "2"}]));
}

#[test]
fn test_sample_stream_is_fixed() {
    assert_eq!(
        sample_stream(),
        vec![json!({"value": 22.0}), json!({"value": 22.3}), json!({"value": 22.1})]
    );
}

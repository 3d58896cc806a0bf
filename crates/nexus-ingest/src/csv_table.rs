use csv::ReaderBuilder;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Result;

/// Delimited text decoded into header-keyed row mappings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvRows {
    pub headers: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

impl CsvRows {
    pub fn has_header(&self) -> bool {
        !self.headers.is_empty()
    }

    /// Number of logged actions: one per data row, or a single action for a
    /// header-only table, or none for empty input.
    pub fn action_count(&self) -> usize {
        if !self.rows.is_empty() {
            self.rows.len()
        } else if self.has_header() {
            1
        } else {
            0
        }
    }

    /// Rows as a JSON sequence, ready to embed in a record.
    pub fn rows_value(&self) -> Value {
        Value::Array(self.rows.iter().cloned().map(Value::Object).collect())
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Reads comma-separated text whose first line is the header row.
///
/// Short rows are padded with null; fields past the last header are dropped.
pub fn read_csv_text(text: &str) -> Result<CsvRows> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.trim().as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(normalize_header).collect(),
        None => return Ok(CsvRows::default()),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        let mut row = Map::new();
        for (index, header) in headers.iter().enumerate() {
            let value = record
                .get(index)
                .map_or(Value::Null, |field| Value::String(field.to_string()));
            row.insert(header.clone(), value);
        }
        rows.push(row);
    }

    debug!(
        header_count = headers.len(),
        row_count = rows.len(),
        "csv text decoded"
    );
    Ok(CsvRows { headers, rows })
}

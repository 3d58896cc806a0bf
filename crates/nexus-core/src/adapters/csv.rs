use std::sync::Arc;

use nexus_ingest::read_csv_text;
use nexus_model::{Record, keys};
use serde_json::{Map, Value};

use crate::chain::StageChain;
use crate::error::{AdapterError, Result};
use crate::pipeline::{AdapterKind, Pipeline};
use crate::stages::Stage;

/// Accepts delimited text whose first line is the header row.
#[derive(Debug)]
pub struct CsvAdapter {
    chain: StageChain,
}

impl CsvAdapter {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            chain: StageChain::new(id),
        }
    }

    #[must_use]
    pub fn with_default_stages(mut self) -> Self {
        self.chain.add_default_stages();
        self
    }

    #[must_use]
    pub fn with_stage(mut self, stage: Arc<dyn Stage>) -> Self {
        self.chain.add_stage(stage);
        self
    }

    fn prepare(raw: Record) -> std::result::Result<Record, AdapterError> {
        let Record::Text(text) = raw else {
            return Err(AdapterError::ExpectsText {
                found: raw.type_name(),
            });
        };
        let table = read_csv_text(&text)?;

        let mut analysis = Map::new();
        analysis.insert(keys::ACTIONS.to_string(), Value::from(table.action_count()));

        let mut map = Map::new();
        map.insert(keys::TYPE.to_string(), Value::from(keys::CSV_TYPE));
        map.insert(keys::ROWS.to_string(), table.rows_value());
        map.insert(keys::ANALYSIS.to_string(), Value::Object(analysis));
        map.insert(keys::FINAL.to_string(), Value::Bool(true));
        map.insert(keys::META.to_string(), Value::Object(Map::new()));
        Ok(Record::Structured(map))
    }
}

impl Pipeline for CsvAdapter {
    fn adapter(&self) -> AdapterKind {
        AdapterKind::Csv
    }

    fn chain(&self) -> &StageChain {
        &self.chain
    }

    fn chain_mut(&mut self) -> &mut StageChain {
        &mut self.chain
    }

    fn process(&mut self, raw: Record) -> Result<Record> {
        let result =
            Self::prepare(raw).and_then(|record| self.chain.run(record).map_err(AdapterError::from));
        self.chain.finish(AdapterKind::Csv, result)
    }
}

use std::sync::Arc;

use nexus_ingest::decode_json_text;
use nexus_model::{Record, SafeMode, keys};
use serde_json::{Map, Value};

use crate::chain::StageChain;
use crate::error::{AdapterError, Result};
use crate::pipeline::{AdapterKind, Pipeline};
use crate::stages::Stage;

/// Accepts object-encoded text or an in-memory mapping.
///
/// Every record is marked `final` and carries `meta.safe_mode`. Safe mode
/// defaults to [`SafeMode::FromIdentifier`], so an identifier ending in
/// `_BACKUP` yields a lenient backup variant; prefer setting it explicitly
/// with [`JsonAdapter::with_safe_mode`].
#[derive(Debug)]
pub struct JsonAdapter {
    chain: StageChain,
    safe_mode: bool,
}

impl JsonAdapter {
    pub fn new(id: impl Into<String>) -> Self {
        let chain = StageChain::new(id);
        let safe_mode = SafeMode::FromIdentifier.resolve(chain.id());
        Self { chain, safe_mode }
    }

    #[must_use]
    pub fn with_safe_mode(mut self, mode: SafeMode) -> Self {
        self.safe_mode = mode.resolve(self.chain.id());
        self
    }

    /// Append the standard Input, Transform, Output stages.
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

    pub fn safe_mode(&self) -> bool {
        self.safe_mode
    }

    fn prepare(&self, raw: Record) -> std::result::Result<Record, AdapterError> {
        let mut map = match raw {
            Record::Text(text) => decode_json_text(&text)?,
            Record::Structured(map) => map,
            other => {
                return Err(AdapterError::ExpectsTextOrMapping {
                    found: other.type_name(),
                });
            }
        };

        map.insert(keys::FINAL.to_string(), Value::Bool(true));
        let meta = map
            .entry(keys::META)
            .or_insert_with(|| Value::Object(Map::new()));
        if meta.is_null() {
            *meta = Value::Object(Map::new());
        }
        let Some(meta) = meta.as_object_mut() else {
            return Err(AdapterError::MetaNotMapping);
        };
        meta.insert(keys::SAFE_MODE.to_string(), Value::Bool(self.safe_mode));
        Ok(Record::Structured(map))
    }
}

impl Pipeline for JsonAdapter {
    fn adapter(&self) -> AdapterKind {
        AdapterKind::Json
    }

    fn chain(&self) -> &StageChain {
        &self.chain
    }

    fn chain_mut(&mut self) -> &mut StageChain {
        &mut self.chain
    }

    fn process(&mut self, raw: Record) -> Result<Record> {
        let result = self
            .prepare(raw)
            .and_then(|record| self.chain.run(record).map_err(AdapterError::from));
        self.chain.finish(AdapterKind::Json, result)
    }
}

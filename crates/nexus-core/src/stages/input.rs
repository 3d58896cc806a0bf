use nexus_model::{Record, StageError, StageKind, keys};
use serde_json::{Map, Value};

use super::Stage;

const STAGE: StageKind = StageKind::Input;

/// Validates the raw shape reaching the chain.
///
/// Structured records get an empty `meta` mapping when none is present,
/// sequences pass through, and text is trimmed. Null, empty text and scalars
/// are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputStage;

impl Stage for InputStage {
    fn kind(&self) -> StageKind {
        STAGE
    }

    fn name(&self) -> &str {
        "InputStage"
    }

    fn process(&self, record: Record) -> Result<Record, StageError> {
        match record {
            Record::Null => Err(StageError::MissingData { stage: STAGE }),
            Record::Structured(mut map) => {
                match map.get(keys::META) {
                    None | Some(Value::Null) => {
                        map.insert(keys::META.to_string(), Value::Object(Map::new()));
                    }
                    Some(Value::Object(_)) => {}
                    Some(_) => return Err(StageError::MetaNotMapping { stage: STAGE }),
                }
                Ok(Record::Structured(map))
            }
            Record::Sequence(items) => Ok(Record::Sequence(items)),
            Record::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Err(StageError::UnsupportedType {
                        stage: STAGE,
                        found: "empty text",
                    })
                } else {
                    Ok(Record::Text(trimmed.to_string()))
                }
            }
            other @ Record::Scalar(_) => Err(StageError::UnsupportedType {
                stage: STAGE,
                found: other.type_name(),
            }),
        }
    }
}

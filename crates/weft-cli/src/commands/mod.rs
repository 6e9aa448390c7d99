pub mod apply;
pub mod diff;

use std::path::Path;

use weft_core::errors::{ExError, ExErrorKind};
use weft_core::EntityValue;

/// Read a JSON document from `path` as an entity value
pub fn read_entity(path: &Path) -> Result<EntityValue, ExError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op("read_entity")
            .with_path(path.display().to_string())
            .with_message(e.to_string())
    })?;
    serde_json::from_str(&text).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("read_entity")
            .with_path(path.display().to_string())
            .with_message(e.to_string())
    })
}

pub fn to_json(value: &impl serde::Serialize, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

//! Writes a [`Blueprint`] back out as YAML.
//!
//! Only fields that change how a scope behaves are emitted: empty slot lists
//! and disabled flags are dropped, so a blueprint for a plain three-slot scope
//! serializes to a single `required:` list.

use crate::error::SerializeError;
use crate::types::Blueprint;

/// Serialize a blueprint to YAML that [`crate::parse::parse`] accepts.
///
/// Delegated methods are written under `chainUpDowns` and the re-entry flag
/// under `chainUpDown`, matching the keys a scope reserves for its own
/// configuration.
pub fn serialize(blueprint: &Blueprint) -> Result<String, SerializeError> {
    let value = serde_json::to_value(blueprint).map_err(|e| SerializeError {
        message: format!("blueprint is not representable as a mapping: {}", e),
    })?;

    serde_saphyr::to_string(&value).map_err(|e| SerializeError {
        message: format!("failed to write blueprint YAML: {}", e),
    })
}

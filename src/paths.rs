//! Path lookups over collected scope data.
//!
//! Two flavours: plain dot-paths (`server.tls.cert`) for the common case and
//! full JSONPath queries for anything that needs wildcards or filters.

use crate::error::{ChainError, ChainErrorKind};
use serde_json::Value;

/// Resolves a simple dot-path against a value tree.
///
/// Returns the single value at the path, or `None` if any segment fails to
/// resolve. Empty path returns the root value.
pub fn resolve_simple_path(path: &str, value: &Value) -> Option<Value> {
    if path.is_empty() {
        return Some(value.clone());
    }

    let mut current = value;
    for segment in path.split('.') {
        match current.as_object().and_then(|obj| obj.get(segment)) {
            Some(v) => current = v,
            None => return None,
        }
    }
    Some(current.clone())
}

/// Runs a JSONPath query and returns every matched node, in document order.
pub fn query_path(query: &str, value: &Value) -> Result<Vec<Value>, ChainError> {
    let path = serde_json_path::JsonPath::parse(query).map_err(|e| {
        ChainError::new(
            ChainErrorKind::InvalidPath,
            format!("invalid JSONPath '{}': {}", query, e),
        )
    })?;
    Ok(path.query(value).all().into_iter().cloned().collect())
}

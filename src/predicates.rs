//! Primitive value classifiers.
//!
//! Small side-effect-free checks used by the container and the completion
//! protocol. Absence is modelled as `Option::None`, never as `Value::Null`.

use serde_json::Value;

/// True when a lookup produced nothing.
pub fn is_undefined(value: Option<&Value>) -> bool {
    value.is_none()
}

pub fn is_null(value: &Value) -> bool {
    value.is_null()
}

/// Strictly the boolean `true`; `1` or `"true"` do not count.
pub fn is_true(value: &Value) -> bool {
    matches!(value, Value::Bool(true))
}

/// Strictly the boolean `false`.
pub fn is_false(value: &Value) -> bool {
    matches!(value, Value::Bool(false))
}

/// Object-like values (JSON mappings). Arrays are not objects here.
pub fn is_obj(value: &Value) -> bool {
    value.is_object()
}

/// Loose truthiness.
///
/// `null`, `false`, numeric zero and the empty string are falsy. Everything
/// else is truthy, including empty arrays and empty objects.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}


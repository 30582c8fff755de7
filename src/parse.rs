use crate::error::{ParseError, ParseErrorKind};
use crate::types::Blueprint;

const KNOWN_FIELDS: &[&str] = &["required", "optional", "chainUpDowns", "chainUpDown", "strict"];

/// Parse a YAML string into an unvalidated Blueprint.
///
/// Performs YAML deserialization and type mapping only.
/// Does NOT check slot names; see [`crate::validate::validate`].
pub fn parse(input: &str) -> Result<Blueprint, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError {
            kind: ParseErrorKind::Syntax,
            message: "empty input".to_string(),
            path: None,
        });
    }

    // YAML → serde_json::Value first so structural problems get precise errors
    let value: serde_json::Value = serde_saphyr::from_str(input).map_err(|e| ParseError {
        kind: ParseErrorKind::Syntax,
        message: e.to_string(),
        path: None,
    })?;

    let Some(obj) = value.as_object() else {
        return Err(ParseError {
            kind: ParseErrorKind::TypeMismatch,
            message: "blueprint root must be a YAML mapping".to_string(),
            path: None,
        });
    };

    for key in obj.keys() {
        if !KNOWN_FIELDS.contains(&key.as_str()) {
            return Err(ParseError {
                kind: ParseErrorKind::UnknownField,
                message: format!("unknown blueprint field: {}", key),
                path: Some(key.clone()),
            });
        }
    }

    serde_json::from_value(value).map_err(|e| {
        let msg = e.to_string();
        ParseError {
            kind: classify_json_error(&msg),
            message: msg,
            path: None,
        }
    })
}

fn classify_json_error(msg: &str) -> ParseErrorKind {
    if msg.contains("unknown field") {
        ParseErrorKind::UnknownField
    } else if msg.contains("invalid type") || msg.contains("expected") {
        ParseErrorKind::TypeMismatch
    } else {
        ParseErrorKind::Syntax
    }
}

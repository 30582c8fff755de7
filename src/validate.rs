//! Blueprint validation.
//!
//! Returns **all** errors and warnings, not just the first. Validation does not
//! modify the blueprint. Repeated required names are legal (each one counts
//! toward completion) and only produce a warning.

use crate::error::*;
use crate::factory::{CHAIN_UP_DOWN_KEY, ON_DONE_KEY};
use crate::types::Blueprint;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static MEMBER_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

const RESERVED_NAMES: &[&str] = &[CHAIN_UP_DOWN_KEY, ON_DONE_KEY];

/// Validate a parsed blueprint.
pub fn validate(blueprint: &Blueprint) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    v001_member_names(blueprint, &mut errors);
    v002_reserved_names(blueprint, &mut errors);
    v003_required_optional_overlap(blueprint, &mut errors);
    v004_delegate_shadows_slot(blueprint, &mut errors);
    w001_duplicate_required(blueprint, &mut warnings);
    w002_never_completes(blueprint, &mut warnings);

    ValidationResult { errors, warnings }
}

/// Every declared member, tagged with the blueprint field it came from.
fn members(blueprint: &Blueprint) -> impl Iterator<Item = (String, &str)> {
    let required = blueprint
        .required
        .iter()
        .enumerate()
        .map(|(i, n)| (format!("required[{}]", i), n.as_str()));
    let optional = blueprint
        .optional
        .iter()
        .enumerate()
        .map(|(i, n)| (format!("optional[{}]", i), n.as_str()));
    let delegates = blueprint
        .delegates
        .iter()
        .enumerate()
        .map(|(i, n)| (format!("chainUpDowns[{}]", i), n.as_str()));
    required.chain(optional).chain(delegates)
}

// ─── V-001: names are identifiers ───────────────────────────────────────────

fn v001_member_names(blueprint: &Blueprint, errors: &mut Vec<ValidationError>) {
    for (path, name) in members(blueprint) {
        if !MEMBER_NAME_RE.is_match(name) {
            errors.push(ValidationError {
                rule: "V-001".to_string(),
                path,
                message: format!("'{}' is not a valid member name", name),
            });
        }
    }
}

// ─── V-002: reserved configuration keys ─────────────────────────────────────

fn v002_reserved_names(blueprint: &Blueprint, errors: &mut Vec<ValidationError>) {
    for (path, name) in members(blueprint) {
        if RESERVED_NAMES.contains(&name) {
            errors.push(ValidationError {
                rule: "V-002".to_string(),
                path,
                message: format!("'{}' is a reserved configuration key", name),
            });
        }
    }
}

// ─── V-003: a slot is either required or optional ───────────────────────────

fn v003_required_optional_overlap(blueprint: &Blueprint, errors: &mut Vec<ValidationError>) {
    let required: HashSet<&str> = blueprint.required.iter().map(String::as_str).collect();
    for (i, name) in blueprint.optional.iter().enumerate() {
        if required.contains(name.as_str()) {
            // the optional setter would replace the counted one and the
            // scope could never reach its expected count
            errors.push(ValidationError {
                rule: "V-003".to_string(),
                path: format!("optional[{}]", i),
                message: format!("'{}' is declared both required and optional", name),
            });
        }
    }
}

// ─── V-004: delegates must not shadow slots ─────────────────────────────────

fn v004_delegate_shadows_slot(blueprint: &Blueprint, errors: &mut Vec<ValidationError>) {
    let slots: HashSet<&str> = blueprint
        .required
        .iter()
        .chain(&blueprint.optional)
        .map(String::as_str)
        .collect();
    for (i, name) in blueprint.delegates.iter().enumerate() {
        if slots.contains(name.as_str()) {
            errors.push(ValidationError {
                rule: "V-004".to_string(),
                path: format!("chainUpDowns[{}]", i),
                message: format!("delegated method '{}' shadows a slot of the same name", name),
            });
        }
    }
}

// ─── W-001: repeated required names ─────────────────────────────────────────

fn w001_duplicate_required(blueprint: &Blueprint, warnings: &mut Vec<Diagnostic>) {
    let mut seen = HashSet::new();
    for (i, name) in blueprint.required.iter().enumerate() {
        if !seen.insert(name.as_str()) {
            warnings.push(Diagnostic {
                severity: DiagnosticSeverity::Warning,
                code: "W-001".to_string(),
                path: Some(format!("required[{}]", i)),
                message: format!(
                    "'{}' is declared more than once; each declaration adds to the expected count",
                    name
                ),
            });
        }
    }
}

// ─── W-002: nothing to complete on ──────────────────────────────────────────

fn w002_never_completes(blueprint: &Blueprint, warnings: &mut Vec<Diagnostic>) {
    if blueprint.required.is_empty() {
        warnings.push(Diagnostic {
            severity: DiagnosticSeverity::Warning,
            code: "W-002".to_string(),
            path: Some("required".to_string()),
            message: "no required slots; the scope only completes through an explicit end"
                .to_string(),
        });
    }
}

//! Fluent method-chaining scopes for building configuration DSLs.
//!
//! A [`Scope`] declares the slots it expects. Filling a slot returns the scope
//! again until the last one is filled, at which point the scope completes and
//! control pops back to its parent, or to whatever a completion hook chooses:
//!
//! ```text
//! parent.invoke("server") → child
//!   child.call_slot("host") → child
//!   child.call_slot("port") → parent      (all slots filled)
//! ```
//!
//! With chain-up-down enabled, filling the same slot twice closes the current
//! scope and continues on a fresh sibling produced by the parent.
//!
//! # Quick Start
//!
//! ```rust
//! use chainable::{Next, Scope};
//! use serde_json::json;
//!
//! let root = Scope::new();
//! root.define_method("server", |root, _args| {
//!     let child = Scope::with_parent(root);
//!     child.declare_slots(&["host", "port"])?;
//!     Ok(Next::Scope(child))
//! });
//!
//! let next = root
//!     .invoke("server", &[])
//!     .and_then(|n| n.call_slot("host", json!("localhost")))
//!     .and_then(|n| n.call_slot("port", json!(8080)))
//!     .expect("valid chain");
//! assert!(next.is_scope(&root));
//! ```
//!
//! Scopes can also be described declaratively as YAML blueprints; see
//! [`load`].

pub mod error;
pub mod factory;
pub mod map;
pub mod parse;
pub mod paths;
pub mod predicates;
pub mod serialize;
pub mod types;
pub mod validate;

pub use error::*;
pub use factory::{ChainUpDown, Completion, Finalizer, Next, Scope, SlotHandler, handler};
pub use map::{ChainedMap, Container};
pub use types::*;

// Re-export entry-point functions at the crate root for convenience.
pub use parse::parse;
pub use serialize::serialize;
pub use validate::validate;

/// Result of the [`load`] convenience entry point.
pub struct LoadResult {
    /// The root scope built from the blueprint.
    pub scope: Scope,
    /// Non-fatal warnings produced during validation.
    pub warnings: Vec<Diagnostic>,
}

/// Convenience entry point composing parse → validate → instantiate.
///
/// Returns a root scope and any warnings on success.
/// Returns all errors (parse, validation or instantiation) on failure.
///
/// # Errors
///
/// Returns `Err(Vec<LoadError>)` if parsing fails or validation finds errors.
///
/// # Example
///
/// ```rust
/// let yaml = r#"
/// required: [host, port]
/// optional: [tls]
/// "#;
///
/// match chainable::load(yaml) {
///     Ok(result) => println!("{} slots expected", result.scope.expected_count()),
///     Err(errors) => eprintln!("{} errors", errors.len()),
/// }
/// ```
pub fn load(input: &str) -> Result<LoadResult, Vec<LoadError>> {
    let blueprint = parse::parse(input).map_err(|e| vec![LoadError::Parse(e)])?;

    let result = validate::validate(&blueprint);
    if !result.errors.is_empty() {
        return Err(result
            .errors
            .into_iter()
            .map(LoadError::Validation)
            .collect());
    }

    let scope = blueprint
        .instantiate(None)
        .map_err(|e| vec![LoadError::Chain(e)])?;

    Ok(LoadResult {
        scope,
        warnings: result.warnings,
    })
}

use serde::{Deserialize, Serialize};

use crate::error::ChainError;
use crate::factory::{ChainUpDown, Scope};

// ─── Blueprint ──────────────────────────────────────────────────────────────

/// Serialisable description of one scope: which slots it expects and how it
/// hands control back.
///
/// ```yaml
/// required: [host, port]
/// optional: [tls]
/// chainUpDowns: [server]
/// chainUpDown: true
/// strict: false
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Blueprint {
    /// Slots counted toward completion, declared in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Slots that store data but never complete the scope.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optional: Vec<String>,
    /// Methods forwarded to the parent after ending the scope.
    #[serde(rename = "chainUpDowns", default, skip_serializing_if = "Vec::is_empty")]
    pub delegates: Vec<String>,
    /// Re-fills start a fresh scope from the parent's method of the same name.
    #[serde(rename = "chainUpDown", default, skip_serializing_if = "is_false")]
    pub chain_up_down: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strict: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Blueprint {
    /// Builds a scope from this blueprint.
    ///
    /// Slots are declared before chain-up-down is switched on, so a repeated
    /// required name inflates the expected count instead of re-entering.
    pub fn instantiate(&self, parent: Option<&Scope>) -> Result<Scope, ChainError> {
        let scope = match parent {
            Some(parent) => Scope::with_parent(parent),
            None => Scope::new(),
        };

        let required: Vec<&str> = self.required.iter().map(String::as_str).collect();
        scope.declare_slots(&required)?;

        for name in &self.optional {
            scope.declare_optional(name, None);
        }

        let delegates: Vec<&str> = self.delegates.iter().map(String::as_str).collect();
        scope.chain_up_downs(&delegates);

        if self.chain_up_down {
            scope.set_chain_up_down(ChainUpDown::Parent);
        }
        scope.set_strict(self.strict);

        Ok(scope)
    }
}

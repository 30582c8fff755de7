//! Insertion-ordered key/value storage behind every scope.
//!
//! [`Container`] is the seam: a scope only ever reads and writes its data
//! through these methods, so a wrapper that intercepts `set` (to coerce or
//! observe values) sees every write, including the ones made by [`Container::tap`].

use crate::paths::resolve_simple_path;
use serde_json::{Map, Value};

/// Minimal mapping interface a scope stores its data in.
pub trait Container {
    fn get(&self, key: &str) -> Option<&Value>;

    fn set(&mut self, key: &str, value: Value);

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn delete(&mut self, key: &str) -> Option<Value>;

    /// Snapshot of every entry, in insertion order.
    fn entries(&self) -> Map<String, Value>;

    /// Read-modify-write of a single entry. `update` receives `None` when the
    /// key is absent; whatever it returns is stored through [`Container::set`].
    fn tap(&mut self, key: &str, update: &mut dyn FnMut(Option<&Value>) -> Value) {
        let next = update(self.get(key));
        self.set(key, next);
    }
}

/// The default [`Container`]: a `serde_json::Map` that keeps insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChainedMap {
    store: Map<String, Value>,
}

impl ChainedMap {
    pub fn new() -> Self {
        ChainedMap::default()
    }

    pub fn from_entries(entries: Map<String, Value>) -> Self {
        ChainedMap { store: entries }
    }

    /// Sets every entry of `other` in order, overwriting existing keys.
    pub fn merge(&mut self, other: &Map<String, Value>) -> &mut Self {
        for (key, value) in other {
            self.store.insert(key.clone(), value.clone());
        }
        self
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.store.keys()
    }

    /// Dot-path lookup into nested object values, e.g. `"server.port"`.
    pub fn get_path(&self, path: &str) -> Option<Value> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, rest),
            None => (path, ""),
        };
        self.store
            .get(head)
            .and_then(|value| resolve_simple_path(rest, value))
    }
}

impl Container for ChainedMap {
    fn get(&self, key: &str) -> Option<&Value> {
        self.store.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.store.insert(key.to_string(), value);
    }

    fn has(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    fn delete(&mut self, key: &str) -> Option<Value> {
        // shift_remove keeps the remaining keys in insertion order
        self.store.shift_remove(key)
    }

    fn entries(&self) -> Map<String, Value> {
        self.store.clone()
    }
}

//! Factory chains: nested builder scopes that know when they are done.
//!
//! A [`Scope`] declares a fixed set of slots. Every slot gets a setter in the
//! scope's member table; filling the last outstanding slot completes the scope
//! and hands back a continuation ([`Next`]) instead of the scope itself. By
//! default that continuation is the parent scope, so a fluent caller pops back
//! up without naming it:
//!
//! ```rust
//! use chainable::factory::Scope;
//! use serde_json::json;
//!
//! let parent = Scope::new();
//! let child = Scope::with_parent(&parent);
//! child.declare_slots(&["host", "port"]).unwrap();
//!
//! let next = child.call_slot("host", json!("localhost")).unwrap();
//! assert!(next.is_scope(&child));
//!
//! let next = next.call_slot("port", json!(8080)).unwrap();
//! assert!(next.is_scope(&parent));
//! assert_eq!(child.get_data(None), json!({"host": "localhost", "port": 8080}));
//! ```
//!
//! Completion resolves through three tiers, first match wins: a finalizer
//! supplied at construction, then an `on_done` hook, then the parent.
//!
//! With chain-up-down enabled, filling an already-filled slot (or declaring
//! an existing one) ends the current generation and re-dispatches the call
//! to a fresh sibling scope obtained from the parent or a provider.

use crate::error::{ChainError, ChainErrorKind};
use crate::map::{ChainedMap, Container};
use crate::paths::{query_path, resolve_simple_path};
use crate::predicates::is_truthy;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, trace, warn};

/// Reserved configuration key enabling chain-up-down delegation.
pub const CHAIN_UP_DOWN_KEY: &str = "chainUpDown";

/// Reserved configuration key holding the instance completion hook.
pub const ON_DONE_KEY: &str = "onDone";

/// Custom slot setter. Receives the owning scope and the raw argument; the
/// value is not stored automatically when a handler is present.
pub type SlotHandler = Rc<dyn Fn(&Scope, Value) -> Result<(), ChainError>>;

/// A named method in a scope's member table.
pub type Method = Rc<dyn Fn(&Scope, &[Value]) -> Result<Next, ChainError>>;

/// Produces the fresh scope a chain-up-down re-entry dispatches to.
pub type Provider = Rc<dyn Fn(&Scope) -> Result<Next, ChainError>>;

/// Wraps a closure as a [`SlotHandler`].
pub fn handler<F>(f: F) -> SlotHandler
where
    F: Fn(&Scope, Value) -> Result<(), ChainError> + 'static,
{
    Rc::new(f)
}

// ─── Continuations ──────────────────────────────────────────────────────────

/// What a setter, method or `end` hands back to the caller.
#[derive(Clone, Debug)]
pub enum Next {
    /// Keep chaining on this scope (the same one, its parent, or a sibling).
    Scope(Scope),
    /// A plain value substituted by a completion hook.
    Value(Value),
    /// Completion with no live parent to return to.
    Detached,
}

impl Next {
    pub fn as_scope(&self) -> Option<&Scope> {
        match self {
            Next::Scope(scope) => Some(scope),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Next::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_scope(self) -> Result<Scope, ChainError> {
        match self {
            Next::Scope(scope) => Ok(scope),
            Next::Value(value) => Err(ChainError::new(
                ChainErrorKind::NotAScope,
                format!("continuation is a value, not a scope: {}", value),
            )),
            Next::Detached => Err(ChainError::new(
                ChainErrorKind::NotAScope,
                "continuation is detached (no parent to return to)",
            )),
        }
    }

    /// True when this continuation is exactly `scope` (same handle).
    pub fn is_scope(&self, scope: &Scope) -> bool {
        self.as_scope().is_some_and(|s| s.ptr_eq(scope))
    }

    pub fn is_detached(&self) -> bool {
        matches!(self, Next::Detached)
    }

    /// Whether a hook result may replace the default continuation of
    /// `scope`: truthy, and not the completing scope itself.
    pub fn is_usable_for(&self, scope: &Scope) -> bool {
        match self {
            Next::Scope(s) => !s.ptr_eq(scope),
            Next::Value(v) => is_truthy(v),
            Next::Detached => false,
        }
    }

    pub fn call_slot(self, name: &str, value: Value) -> Result<Next, ChainError> {
        self.into_scope()
            .map_err(|e| e.with_member(name))?
            .call_slot(name, value)
    }

    pub fn invoke(self, name: &str, args: &[Value]) -> Result<Next, ChainError> {
        self.into_scope()
            .map_err(|e| e.with_member(name))?
            .invoke(name, args)
    }

    pub fn end(self, arg: Option<Value>) -> Result<Next, ChainError> {
        self.into_scope()?.end(arg)
    }
}

// ─── Completion hooks ───────────────────────────────────────────────────────

/// Arguments handed to completion hooks.
pub struct Completion<'a> {
    /// Snapshot of the scope's data at completion time.
    pub data: &'a Map<String, Value>,
    pub parent: Option<&'a Scope>,
    pub scope: &'a Scope,
    /// Only set when a caller ends the scope explicitly with an argument.
    pub arg: Option<&'a Value>,
}

/// Overrides what a completing scope returns.
///
/// Returning `None`, a falsy value, or the completing scope itself falls back
/// to the parent.
pub trait Finalizer {
    fn end(&self, done: &Completion<'_>) -> Option<Next>;
}

impl<F> Finalizer for F
where
    F: Fn(&Completion<'_>) -> Option<Next>,
{
    fn end(&self, done: &Completion<'_>) -> Option<Next> {
        self(done)
    }
}

/// Where a chain-up-down re-entry gets its fresh scope from.
#[derive(Clone)]
pub enum ChainUpDown {
    /// Invoke the parent's method of the same name with no arguments.
    Parent,
    /// Ask a provider; the slot call is then re-dispatched to its result.
    Provider(Provider),
}

impl ChainUpDown {
    pub fn provider<F>(f: F) -> Self
    where
        F: Fn(&Scope) -> Result<Next, ChainError> + 'static,
    {
        ChainUpDown::Provider(Rc::new(f))
    }
}

impl fmt::Debug for ChainUpDown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainUpDown::Parent => write!(f, "Parent"),
            ChainUpDown::Provider(_) => write!(f, "Provider(..)"),
        }
    }
}

// ─── Scope ──────────────────────────────────────────────────────────────────

#[derive(Clone)]
enum Member {
    Slot {
        handler: Option<SlotHandler>,
        /// Optional slots store data but never count toward completion.
        counted: bool,
    },
    Method(Method),
}

/// Slot data lives in its own cell so a user container is never called while
/// the scope state is borrowed.
type Store = Rc<RefCell<Box<dyn Container>>>;

struct ScopeState {
    data: Store,
    config: ChainedMap,
    members: HashMap<String, Member>,
    filled: Vec<String>,
    expected: usize,
    parent: Option<Weak<RefCell<ScopeState>>>,
    finalizer: Option<Rc<dyn Finalizer>>,
    on_done: Option<Rc<dyn Finalizer>>,
    chain_up_down: Option<ChainUpDown>,
    strict: bool,
    completions: usize,
}

/// Handle to one factory-chain scope.
///
/// Clones share state. A scope holds only a weak link to its parent, so the
/// caller must keep the root alive for completions to return to it.
#[derive(Clone)]
pub struct Scope {
    inner: Rc<RefCell<ScopeState>>,
}

impl Default for Scope {
    fn default() -> Self {
        Scope::new()
    }
}

impl Scope {
    /// A root scope with no parent.
    pub fn new() -> Self {
        Scope::build(None, None, Box::new(ChainedMap::new()))
    }

    pub fn with_parent(parent: &Scope) -> Self {
        Scope::build(Some(parent), None, Box::new(ChainedMap::new()))
    }

    /// A scope whose completion is decided by `finalizer` before any
    /// `on_done` hook or the parent.
    pub fn with_finalizer<F>(parent: Option<&Scope>, finalizer: F) -> Self
    where
        F: Finalizer + 'static,
    {
        Scope::build(parent, Some(Rc::new(finalizer)), Box::new(ChainedMap::new()))
    }

    /// A scope that writes slot values through `store` instead of a plain
    /// [`ChainedMap`].
    pub fn with_store(parent: Option<&Scope>, store: Box<dyn Container>) -> Self {
        Scope::build(parent, None, store)
    }

    fn build(
        parent: Option<&Scope>,
        finalizer: Option<Rc<dyn Finalizer>>,
        data: Box<dyn Container>,
    ) -> Self {
        Scope {
            inner: Rc::new(RefCell::new(ScopeState {
                data: Rc::new(RefCell::new(data)),
                config: ChainedMap::new(),
                members: HashMap::new(),
                filled: Vec::new(),
                expected: 0,
                parent: parent.map(|p| Rc::downgrade(&p.inner)),
                finalizer,
                on_done: None,
                chain_up_down: None,
                strict: false,
                completions: 0,
            })),
        }
    }

    // ─── configuration ──────────────────────────────────────────────────────

    pub fn set_chain_up_down(&self, mode: ChainUpDown) -> &Self {
        self.inner.borrow_mut().chain_up_down = Some(mode);
        self
    }

    pub fn clear_chain_up_down(&self) -> &Self {
        self.inner.borrow_mut().chain_up_down = None;
        self
    }

    /// Registers the instance completion hook. Ignored while a constructor
    /// finalizer is present.
    pub fn on_done<F>(&self, hook: F) -> &Self
    where
        F: Fn(&Completion<'_>) -> Option<Next> + 'static,
    {
        self.inner.borrow_mut().on_done = Some(Rc::new(hook));
        self
    }

    /// Strict scopes reject re-fills without delegation, fills after
    /// completion, and a second `end`.
    pub fn set_strict(&self, strict: bool) -> &Self {
        self.inner.borrow_mut().strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.inner.borrow().strict
    }

    /// Stores a configuration entry on the scope itself (not slot data).
    pub fn set(&self, key: &str, value: Value) -> &Self {
        self.inner.borrow_mut().config.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.borrow().config.get(key).cloned()
    }

    /// Configuration presence. The reserved keys report whether the
    /// corresponding behaviour is configured.
    pub fn has(&self, key: &str) -> bool {
        let state = self.inner.borrow();
        match key {
            CHAIN_UP_DOWN_KEY => state.chain_up_down.is_some(),
            ON_DONE_KEY => state.on_done.is_some(),
            _ => state.config.has(key),
        }
    }

    pub fn tap<F>(&self, key: &str, mut update: F) -> &Self
    where
        F: FnMut(Option<&Value>) -> Value,
    {
        self.inner.borrow_mut().config.tap(key, &mut update);
        self
    }

    // ─── declaration ────────────────────────────────────────────────────────

    /// Declares one required slot.
    ///
    /// The expected count grows on every call, including repeats. If a
    /// member already exists under `name` and chain-up-down is enabled, this
    /// generation ends and chaining continues on a fresh scope. A fresh scope
    /// that already has `name` is returned as is; otherwise the slot is
    /// installed there once, without another re-entry check.
    pub fn declare_slot(&self, name: &str, handler: Option<SlotHandler>) -> Result<Next, ChainError> {
        let (exists, mode) = {
            let mut state = self.inner.borrow_mut();
            state.expected += 1;
            (state.members.contains_key(name), state.chain_up_down.clone())
        };

        if let (true, Some(mode)) = (exists, mode) {
            debug!(slot = %name, "slot declared twice, chaining up to a fresh scope");
            self.retire()?;
            let fresh = self.chain_up(name, &mode)?;
            if !fresh.has_member(name) {
                fresh.inner.borrow_mut().expected += 1;
                fresh.install_slot(name, handler, true);
            }
            return Ok(Next::Scope(fresh));
        }

        self.install_slot(name, handler, true);
        Ok(Next::Scope(self.clone()))
    }

    fn install_slot(&self, name: &str, handler: Option<SlotHandler>, counted: bool) {
        self.inner
            .borrow_mut()
            .members
            .insert(name.to_string(), Member::Slot { handler, counted });
    }

    /// Declares each name in order. Repeated names are not deduplicated and
    /// each one counts toward the expected total.
    pub fn declare_slots(&self, names: &[&str]) -> Result<&Self, ChainError> {
        for name in names {
            self.declare_slot(name, None)?;
        }
        Ok(self)
    }

    /// Declares a setter that stores data without counting toward completion.
    pub fn declare_optional(&self, name: &str, handler: Option<SlotHandler>) -> &Self {
        self.install_slot(name, handler, false);
        self
    }

    /// Adds a named method, typically one that creates and returns a child
    /// scope.
    pub fn define_method<F>(&self, name: &str, method: F) -> &Self
    where
        F: Fn(&Scope, &[Value]) -> Result<Next, ChainError> + 'static,
    {
        self.inner
            .borrow_mut()
            .members
            .insert(name.to_string(), Member::Method(Rc::new(method)));
        self
    }

    /// Installs methods that end this scope and forward to the parent's
    /// method of the same name with the same arguments.
    pub fn chain_up_downs(&self, methods: &[&str]) -> &Self {
        let mut state = self.inner.borrow_mut();
        for name in methods {
            let method_name = name.to_string();
            let forward: Method = Rc::new(move |scope: &Scope, args: &[Value]| {
                debug!(method = %method_name, "delegating to parent scope");
                scope.retire()?;
                let parent = scope.parent().ok_or_else(|| {
                    ChainError::new(ChainErrorKind::NoParent, "no parent to delegate to")
                        .with_member(method_name.as_str())
                })?;
                parent.invoke(&method_name, args)
            });
            state
                .members
                .insert(name.to_string(), Member::Method(forward));
        }
        drop(state);
        self
    }

    // ─── dispatch ───────────────────────────────────────────────────────────

    /// Fills a slot and returns the continuation.
    pub fn call_slot(&self, name: &str, value: Value) -> Result<Next, ChainError> {
        let (member, refill, completed, strict, mode) = {
            let state = self.inner.borrow();
            let member = state.members.get(name).cloned().ok_or_else(|| {
                ChainError::new(ChainErrorKind::UnknownMember, "no such slot").with_member(name)
            })?;
            (
                member,
                state.filled.iter().any(|f| f == name),
                state.completions > 0,
                state.strict,
                state.chain_up_down.clone(),
            )
        };

        let (handler, counted) = match member {
            Member::Method(method) => return method(self, std::slice::from_ref(&value)),
            Member::Slot { handler, counted } => (handler, counted),
        };

        if refill {
            if let Some(mode) = mode {
                debug!(slot = %name, "slot filled again, starting a new generation");
                self.retire()?;
                return self.chain_up(name, &mode)?.call_slot(name, value);
            }
            if strict {
                return Err(ChainError::new(
                    ChainErrorKind::SlotRefilled,
                    "slot already filled and chain-up-down is disabled",
                )
                .with_member(name));
            }
            warn!(slot = %name, "overwriting a slot that was already filled");
        }

        if strict && completed {
            return Err(
                ChainError::new(ChainErrorKind::Retired, "scope already completed")
                    .with_member(name),
            );
        }

        trace!(slot = %name, "filling slot");
        match handler {
            Some(handler) => handler(self, value)?,
            None => self.store().borrow_mut().set(name, value),
        }

        if !counted {
            return Ok(Next::Scope(self.clone()));
        }

        let complete = {
            let mut state = self.inner.borrow_mut();
            if !state.filled.iter().any(|f| f == name) {
                state.filled.push(name.to_string());
            }
            state.filled.len() == state.expected
        };

        if complete {
            self.end(None)
        } else {
            Ok(Next::Scope(self.clone()))
        }
    }

    /// Calls any member by name. Slot setters receive the first argument, or
    /// `null` when there is none.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Next, ChainError> {
        let member = self.inner.borrow().members.get(name).cloned();
        match member {
            Some(Member::Method(method)) => method(self, args),
            Some(Member::Slot { .. }) => {
                self.call_slot(name, args.first().cloned().unwrap_or(Value::Null))
            }
            None => Err(
                ChainError::new(ChainErrorKind::UnknownMember, "no such member").with_member(name),
            ),
        }
    }

    // ─── completion ─────────────────────────────────────────────────────────

    /// Completes the scope and resolves its continuation.
    ///
    /// Exactly one tier is consulted: the constructor finalizer if there is
    /// one, otherwise the `on_done` hook if there is one. An unusable result
    /// (absent, falsy, or this scope) falls back to the parent.
    pub fn end(&self, arg: Option<Value>) -> Result<Next, ChainError> {
        let (hook, parent) = {
            let mut state = self.inner.borrow_mut();
            if state.completions > 0 {
                if state.strict {
                    return Err(ChainError::new(
                        ChainErrorKind::AlreadyCompleted,
                        "scope already completed",
                    ));
                }
                warn!(completions = state.completions, "ending a scope that already completed");
            }
            state.completions += 1;

            let hook = match (&state.finalizer, &state.on_done) {
                (Some(finalizer), _) => Some(("finalizer", Rc::clone(finalizer))),
                (None, Some(on_done)) => Some(("on_done", Rc::clone(on_done))),
                (None, None) => None,
            };
            let parent = state
                .parent
                .as_ref()
                .and_then(Weak::upgrade)
                .map(|inner| Scope { inner });
            (hook, parent)
        };
        let data = self.store().borrow().entries();

        if let Some((tier, hook)) = hook {
            let done = Completion {
                data: &data,
                parent: parent.as_ref(),
                scope: self,
                arg: arg.as_ref(),
            };
            match hook.end(&done) {
                Some(next) if next.is_usable_for(self) => {
                    debug!(tier, "scope completed with substitute continuation");
                    return Ok(next);
                }
                _ => {}
            }
        }

        debug!(has_parent = parent.is_some(), "scope completed, returning to parent");
        Ok(parent.map_or(Next::Detached, Next::Scope))
    }

    /// Ends the current generation ahead of a delegation. Strict scopes
    /// that already completed are not ended a second time.
    fn retire(&self) -> Result<(), ChainError> {
        let already = {
            let state = self.inner.borrow();
            state.strict && state.completions > 0
        };
        if !already {
            self.end(None)?;
        }
        Ok(())
    }

    fn store(&self) -> Store {
        Rc::clone(&self.inner.borrow().data)
    }

    fn chain_up(&self, name: &str, mode: &ChainUpDown) -> Result<Scope, ChainError> {
        let next = match mode {
            ChainUpDown::Parent => {
                let parent = self.parent().ok_or_else(|| {
                    ChainError::new(ChainErrorKind::NoParent, "no parent to chain up to")
                        .with_member(name)
                })?;
                parent.invoke(name, &[])?
            }
            ChainUpDown::Provider(provider) => provider(self)?,
        };
        next.into_scope().map_err(|e| e.with_member(name))
    }

    // ─── inspection ─────────────────────────────────────────────────────────

    /// All collected data as an object, or the single entry `prop`
    /// (`null` when absent).
    pub fn get_data(&self, prop: Option<&str>) -> Value {
        let store = self.store();
        let data = store.borrow();
        match prop {
            None => Value::Object(data.entries()),
            Some(key) => data.get(key).cloned().unwrap_or(Value::Null),
        }
    }

    /// Dot-path lookup into the collected data.
    pub fn data_at(&self, path: &str) -> Option<Value> {
        resolve_simple_path(path, &self.get_data(None))
    }

    /// JSONPath query over the collected data.
    pub fn query_data(&self, query: &str) -> Result<Vec<Value>, ChainError> {
        query_path(query, &self.get_data(None))
    }

    /// Slots filled in this generation, in fill order.
    pub fn filled_slots(&self) -> Vec<String> {
        self.inner.borrow().filled.clone()
    }

    pub fn expected_count(&self) -> usize {
        self.inner.borrow().expected
    }

    pub fn is_complete(&self) -> bool {
        self.inner.borrow().completions > 0
    }

    /// How many times `end` has run on this scope.
    pub fn completions(&self) -> usize {
        self.inner.borrow().completions
    }

    pub fn parent(&self) -> Option<Scope> {
        self.inner
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| Scope { inner })
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.inner.borrow().members.contains_key(name)
    }

    pub fn is_slot(&self, name: &str) -> bool {
        matches!(
            self.inner.borrow().members.get(name),
            Some(Member::Slot { .. })
        )
    }

    pub fn ptr_eq(&self, other: &Scope) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("Scope")
            .field("data", &state.data.borrow().entries())
            .field("filled", &state.filled)
            .field("expected", &state.expected)
            .field("completions", &state.completions)
            .field("chain_up_down", &state.chain_up_down)
            .field("strict", &state.strict)
            .finish()
    }
}

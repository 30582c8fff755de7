//! Completion threshold: n-1 fills return the scope, the n-th returns the parent.

use super::common::recording_root;
use chainable::Scope;
use serde_json::json;

#[test]
fn nth_distinct_fill_returns_parent() {
    let parent = Scope::new();
    let scope = Scope::with_parent(&parent);
    scope.declare_slots(&["a", "b"]).unwrap();

    let next = scope.call_slot("a", json!(1)).unwrap();
    assert!(next.is_scope(&scope), "first fill must return the scope itself");
    assert!(!scope.is_complete());

    let next = scope.call_slot("b", json!(2)).unwrap();
    assert!(next.is_scope(&parent), "last fill must return the parent");
    assert!(scope.is_complete());
    assert_eq!(scope.get_data(None), json!({"a": 1, "b": 2}));
}

#[test]
fn fill_order_does_not_matter() {
    let parent = Scope::new();
    let scope = Scope::with_parent(&parent);
    scope.declare_slots(&["a", "b", "c"]).unwrap();

    assert!(scope.call_slot("c", json!(3)).unwrap().is_scope(&scope));
    assert!(scope.call_slot("a", json!(1)).unwrap().is_scope(&scope));
    assert!(scope.call_slot("b", json!(2)).unwrap().is_scope(&parent));
    assert_eq!(scope.filled_slots(), vec!["c", "a", "b"]);
}

#[test]
fn fluent_chain_pops_back_to_root() {
    let root = recording_root("server", &["host", "port"], false, false);

    let next = root
        .invoke("server", &[])
        .and_then(|n| n.call_slot("host", json!("localhost")))
        .and_then(|n| n.call_slot("port", json!(8080)))
        .unwrap();

    assert!(next.is_scope(&root));
    assert_eq!(
        root.get("generations"),
        Some(json!([{"host": "localhost", "port": 8080}]))
    );
}

#[test]
fn root_scope_completes_detached() {
    let root = Scope::new();
    root.declare_slots(&["only"]).unwrap();

    let next = root.call_slot("only", json!(true)).unwrap();
    assert!(next.is_detached());
    assert!(next.into_scope().is_err());
}

#[test]
fn completion_after_parent_dropped_is_detached() {
    let parent = Scope::new();
    let scope = Scope::with_parent(&parent);
    scope.declare_slots(&["a"]).unwrap();
    drop(parent);

    assert!(scope.parent().is_none());
    assert!(scope.call_slot("a", json!(1)).unwrap().is_detached());
}

#[test]
fn zero_slots_never_complete_on_their_own() {
    let parent = Scope::new();
    let scope = Scope::with_parent(&parent);
    scope.declare_optional("note", None);

    let next = scope.call_slot("note", json!("hi")).unwrap();
    assert!(next.is_scope(&scope));
    assert!(!scope.is_complete());
    assert!(scope.end(None).unwrap().is_scope(&parent));
}

#[test]
fn optional_slots_do_not_count() {
    let parent = Scope::new();
    let scope = Scope::with_parent(&parent);
    scope.declare_slots(&["a"]).unwrap();
    scope.declare_optional("b", None);

    assert_eq!(scope.expected_count(), 1);
    assert!(scope.call_slot("b", json!(2)).unwrap().is_scope(&scope));
    assert!(scope.call_slot("b", json!(3)).unwrap().is_scope(&scope));
    assert!(scope.call_slot("a", json!(1)).unwrap().is_scope(&parent));
    assert_eq!(scope.get_data(None), json!({"b": 3, "a": 1}));
    assert_eq!(scope.filled_slots(), vec!["a"]);
}

#[test]
fn unknown_slot_is_an_error() {
    let scope = Scope::new();
    let err = scope.call_slot("missing", json!(1)).unwrap_err();
    assert_eq!(err.kind, chainable::ChainErrorKind::UnknownMember);
    assert_eq!(err.member.as_deref(), Some("missing"));
}

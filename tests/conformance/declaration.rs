//! Slot declaration counting and setter installation.

use chainable::Scope;
use serde_json::json;

#[test]
fn expected_count_tracks_declarations() {
    let scope = Scope::new();
    scope.declare_slots(&["a", "b", "c"]).unwrap();
    assert_eq!(scope.expected_count(), 3);
    for name in ["a", "b", "c"] {
        assert!(scope.is_slot(name));
    }
}

/// Pins the documented behaviour: a repeated name counts twice even though
/// only one setter exists, so the scope can no longer complete by filling.
#[test]
fn duplicate_declaration_inflates_expected_count() {
    let parent = Scope::new();
    let scope = Scope::with_parent(&parent);
    scope.declare_slots(&["a", "a"]).unwrap();

    assert_eq!(scope.expected_count(), 2);
    assert!(scope.has_member("a"));

    assert!(scope.call_slot("a", json!(1)).unwrap().is_scope(&scope));
    assert!(scope.call_slot("a", json!(2)).unwrap().is_scope(&scope));
    assert!(!scope.is_complete());
    assert_eq!(scope.filled_slots(), vec!["a"]);
    assert_eq!(scope.get_data(Some("a")), json!(2));
}

#[test]
fn declare_slot_returns_the_scope() {
    let scope = Scope::new();
    let next = scope.declare_slot("a", None).unwrap();
    assert!(next.is_scope(&scope));
}

#[test]
fn redeclaring_without_chain_up_down_replaces_setter() {
    let scope = Scope::new();
    scope.declare_slot("a", None).unwrap();
    scope
        .declare_slot(
            "a",
            Some(chainable::handler(|scope, v| {
                scope.set("handled", v);
                Ok(())
            })),
        )
        .unwrap();

    scope.call_slot("a", json!(5)).unwrap();
    assert_eq!(scope.get("handled"), Some(json!(5)));
    assert_eq!(scope.get_data(Some("a")), json!(null));
}

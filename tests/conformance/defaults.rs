//! Default setters store values verbatim; handlers take over storage.

use chainable::{ChainErrorKind, ChainError, Scope, handler};
use serde_json::json;

#[test]
fn default_setter_stores_raw_value() {
    let scope = Scope::new();
    scope.declare_slots(&["cfg", "other"]).unwrap();

    let value = json!({"nested": {"list": [1, 2, {"deep": null}]}, "flag": true});
    scope.call_slot("cfg", value.clone()).unwrap();

    assert_eq!(scope.get_data(Some("cfg")), value);
    assert_eq!(scope.data_at("cfg.nested.list"), Some(json!([1, 2, {"deep": null}])));
}

#[test]
fn handler_replaces_storage() {
    let scope = Scope::new();
    scope
        .declare_slot(
            "port",
            Some(handler(|scope, v| {
                scope.tap("ports", |current| {
                    let n = current.and_then(|c| c.as_u64()).unwrap_or(0);
                    json!(n + v.as_u64().unwrap_or(0))
                });
                Ok(())
            })),
        )
        .unwrap();
    scope.declare_slots(&["host"]).unwrap();

    assert!(scope.call_slot("port", json!(80)).unwrap().is_scope(&scope));
    assert_eq!(scope.get_data(Some("port")), json!(null));
    assert_eq!(scope.get("ports"), Some(json!(80)));
    assert_eq!(scope.filled_slots(), vec!["port"]);
}

#[test]
fn handler_error_leaves_slot_unfilled() {
    let scope = Scope::new();
    scope
        .declare_slot(
            "port",
            Some(handler(|_scope, v| {
                if v.is_u64() {
                    Ok(())
                } else {
                    Err(ChainError::handler("port must be a number"))
                }
            })),
        )
        .unwrap();

    let err = scope.call_slot("port", json!("eighty")).unwrap_err();
    assert_eq!(err.kind, ChainErrorKind::Handler);
    assert!(scope.filled_slots().is_empty());
}

#[test]
fn get_data_of_missing_entry_is_null() {
    let scope = Scope::new();
    assert_eq!(scope.get_data(Some("nope")), json!(null));
    assert_eq!(scope.get_data(None), json!({}));
}

#[test]
fn query_data_runs_jsonpath() {
    let scope = Scope::new();
    scope.declare_slots(&["servers"]).unwrap();
    scope
        .call_slot("servers", json!([{"host": "a"}, {"host": "b"}]))
        .unwrap();

    assert_eq!(
        scope.query_data("$.servers[*].host").unwrap(),
        vec![json!("a"), json!("b")]
    );
    let err = scope.query_data("$[").unwrap_err();
    assert_eq!(err.kind, ChainErrorKind::InvalidPath);
}

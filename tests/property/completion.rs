use chainable::{ChainUpDown, Next, Scope};
use proptest::prelude::*;
use serde_json::json;

/// Between 1 and 8 distinct slot names.
fn arb_slots() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[a-z][a-z0-9_]{0,6}", 1..8)
        .prop_map(|names| names.into_iter().collect())
}

/// Slot names plus a permutation to fill them in.
fn arb_slots_and_order() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    arb_slots().prop_flat_map(|slots| {
        let order = Just(slots.clone()).prop_shuffle();
        (Just(slots), order)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn only_last_distinct_fill_returns_parent((slots, order) in arb_slots_and_order()) {
        let parent = Scope::new();
        let scope = Scope::with_parent(&parent);
        let names: Vec<&str> = slots.iter().map(String::as_str).collect();
        scope.declare_slots(&names).unwrap();

        for (i, name) in order.iter().enumerate() {
            let next = scope.call_slot(name, json!(i)).unwrap();
            if i + 1 == order.len() {
                prop_assert!(next.is_scope(&parent));
            } else {
                prop_assert!(next.is_scope(&scope));
            }
        }
        prop_assert_eq!(scope.filled_slots(), order.clone());
        prop_assert_eq!(scope.get_data(None).as_object().map(|o| o.len()), Some(slots.len()));
    }

    #[test]
    fn expected_count_equals_declarations(names in prop::collection::vec("[a-c]", 0..10)) {
        let scope = Scope::new();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        scope.declare_slots(&refs).unwrap();
        prop_assert_eq!(scope.expected_count(), names.len());
    }

    #[test]
    fn filled_is_subset_of_declared(
        slots in arb_slots(),
        fills in prop::collection::vec(any::<prop::sample::Index>(), 0..12),
    ) {
        let parent = Scope::new();
        let scope = Scope::with_parent(&parent);
        let names: Vec<&str> = slots.iter().map(String::as_str).collect();
        scope.declare_slots(&names).unwrap();

        for idx in fills {
            let name = idx.get(&slots);
            let _ = scope.call_slot(name, json!(null)).unwrap();
        }
        for filled in scope.filled_slots() {
            prop_assert!(slots.contains(&filled));
        }
    }

    #[test]
    fn each_generation_keeps_its_own_value(values in prop::collection::vec(any::<i64>(), 1..6)) {
        let root = Scope::new();
        root.define_method("item", |root, _args| {
            let child = Scope::with_parent(root);
            child.declare_slots(&["item", "tag"])?;
            child.set_chain_up_down(ChainUpDown::Parent);
            Ok(Next::Scope(child))
        });

        let mut current = root.invoke("item", &[]).unwrap().into_scope().unwrap();
        let mut generations = vec![current.clone()];
        for (i, value) in values.iter().enumerate() {
            let next = current.call_slot("item", json!(value)).unwrap().into_scope().unwrap();
            if i > 0 {
                prop_assert!(!next.ptr_eq(&current));
                generations.push(next.clone());
            }
            current = next;
        }

        prop_assert_eq!(generations.len(), values.len());
        for (scope, value) in generations.iter().zip(&values) {
            prop_assert_eq!(scope.get_data(Some("item")), json!(value));
        }
    }
}

#![no_main]

use arbitrary::Arbitrary;
use chainable::{ChainUpDown, Next, Scope};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Fill(u8),
    Declare(u8),
    End,
}

#[derive(Arbitrary, Debug)]
struct Input {
    slots: u8,
    strict: bool,
    chain_up_down: bool,
    ops: Vec<Op>,
}

const NAMES: &[&str] = &["a", "b", "c", "d"];

fn name(i: u8) -> &'static str {
    NAMES[i as usize % NAMES.len()]
}

fuzz_target!(|input: Input| {
    let slots = 1 + input.slots as usize % NAMES.len();
    let strict = input.strict;
    let up_down = input.chain_up_down;

    let root = Scope::new();
    root.define_method("open", move |root, _args| {
        let child = Scope::with_parent(root);
        child.declare_slots(&NAMES[..slots])?;
        child.set_strict(strict);
        if up_down {
            child.set_chain_up_down(ChainUpDown::Parent);
        }
        Ok(Next::Scope(child))
    });
    for n in NAMES {
        let name = *n;
        root.define_method(name, move |root, _args| root.invoke("open", &[]));
    }

    let Ok(Next::Scope(mut current)) = root.invoke("open", &[]) else {
        return;
    };
    for op in input.ops.iter().take(64) {
        let result = match op {
            Op::Fill(i) => current.call_slot(name(*i), serde_json::json!(i)),
            Op::Declare(i) => current.declare_slot(name(*i), None),
            Op::End => current.end(None),
        };
        match result {
            Ok(Next::Scope(next)) if !next.ptr_eq(&root) => current = next,
            _ => {}
        }
        assert!(current.filled_slots().len() <= current.expected_count());
    }
});

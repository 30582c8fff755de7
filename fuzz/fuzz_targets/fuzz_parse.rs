#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(blueprint) = chainable::parse(input) {
        let result = chainable::validate(&blueprint);
        if result.is_valid() {
            let _ = blueprint.instantiate(None);
        }
        let _ = chainable::serialize(&blueprint);
    }
});

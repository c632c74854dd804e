#![no_main]
use canondiff::{canonicalize, Value};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(value) = text.parse::<Value>() else {
        return;
    };
    // Non-finite floats cannot come out of standard JSON, so encoding
    // parsed input must always succeed.
    let first = canonicalize(&value).expect("parsed JSON canonicalizes");
    let reparsed: Value = first.parse().expect("canonical output parses");
    let second = canonicalize(&reparsed).expect("canonical output re-canonicalizes");
    assert_eq!(first, second);
});

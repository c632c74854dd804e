#![no_main]
use canondiff::{compare, TolerancePolicy, Value};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(value) = text.parse::<Value>() else {
        return;
    };
    // Standard JSON carries no NaN, so self-comparison must always pass.
    let result = compare(&value, &value, &TolerancePolicy::exact());
    assert!(result.ok(), "self-comparison failed: {:?}", result.mismatches());
});

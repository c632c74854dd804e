//! End-to-end properties of canonical encoding and tolerant comparison.

use canondiff::{
    canonicalize, compare, format_summary, raise_on_mismatch, MismatchReason, PolicyOverride,
    TolerancePolicy, Value,
};
use serde_json::json;
use test_case::test_case;

fn value(input: serde_json::Value) -> Value {
    Value::from(input)
}

fn exact() -> TolerancePolicy {
    TolerancePolicy::exact()
}

#[test_case(json!(null))]
#[test_case(json!(-0.0))]
#[test_case(json!({"b": [1, 2.5], "a": {"c": "x", "d": null}}))]
#[test_case(json!([[], {}, "", 0, false]))]
fn canonical_encoding_is_deterministic(input: serde_json::Value) {
    let v = value(input);
    let first = canonicalize(&v).expect("encodes");
    let second = canonicalize(&v).expect("encodes");
    assert_eq!(first, second);
}

#[test_case(json!({"z": 1, "a": [1.5, {"k": "v"}]}))]
#[test_case(json!([0.1, 0.2, 0.30000000000000004]))]
#[test_case(json!("unicode: ü 漢字"))]
fn canonical_form_is_round_trip_stable(input: serde_json::Value) {
    let v = value(input);
    let encoded = canonicalize(&v).expect("encodes");
    let decoded: Value = encoded.parse().expect("canonical form parses");
    assert_eq!(canonicalize(&decoded).expect("encodes"), encoded);
}

#[test]
fn self_comparison_passes_for_finite_values() {
    let v = value(json!({"metrics": [1.5, 2.5], "name": "run", "seed": 42}));
    assert!(compare(&v, &v, &exact()).ok());
}

#[test]
fn nan_self_comparison_fails_unless_nan_equal() {
    // The one documented exception to reflexivity.
    let v = Value::Float(f64::NAN);
    assert!(!compare(&v, &v, &exact()).ok());

    let lenient = TolerancePolicy::builder()
        .nan_equal(true)
        .build()
        .expect("valid policy");
    assert!(compare(&v, &v, &lenient).ok());
}

#[test_case(0.5, 0.0, true; "abs satisfied")]
#[test_case(0.0, 0.0005, true; "rel satisfied")]
#[test_case(0.0, 0.0001, false; "neither satisfied")]
fn either_tolerance_is_sufficient(abs: f64, rel: f64, ok: bool) {
    let policy = TolerancePolicy::builder()
        .abs(abs)
        .rel(rel)
        .build()
        .expect("valid policy");
    let result = compare(&Value::Float(100.0), &Value::Float(100.02), &policy);
    assert_eq!(result.ok(), ok);
}

#[test]
fn shape_mismatch_does_not_suppress_element_diffs() {
    let result = compare(&value(json!([1, 2])), &value(json!([1, 3, 9])), &exact());
    let mismatches = result.mismatches();
    assert_eq!(mismatches.len(), 2);
    assert_eq!(
        mismatches[0].reason,
        MismatchReason::ShapeMismatch {
            expected_len: 2,
            actual_len: 3
        }
    );
    assert_eq!(mismatches[0].path.render(), "$");
    assert_eq!(mismatches[1].path.render(), "$[1]");
    // Index 2 is outside the shared prefix; no mismatch there.
    assert!(mismatches.iter().all(|m| m.path.render() != "$[2]"));
}

#[test]
fn mismatch_order_is_independent_of_insertion_order() {
    let expected = Value::Object(vec![
        ("b".to_string(), Value::Int(0)),
        ("a".to_string(), Value::Int(0)),
    ]);
    let actual = Value::Object(vec![
        ("a".to_string(), Value::Int(1)),
        ("b".to_string(), Value::Int(2)),
    ]);
    let forward = compare(&expected, &actual, &exact());
    let paths: Vec<String> = forward
        .mismatches()
        .iter()
        .map(|m| m.path.render())
        .collect();
    assert_eq!(paths, ["$.a", "$.b"]);

    // Same logical inputs built in the opposite physical order.
    let expected_flipped = Value::Object(vec![
        ("a".to_string(), Value::Int(0)),
        ("b".to_string(), Value::Int(0)),
    ]);
    let flipped = compare(&expected_flipped, &actual, &exact());
    assert_eq!(
        format_summary(&forward, None),
        format_summary(&flipped, None)
    );
}

#[test]
fn per_path_override_does_not_propagate_to_children() {
    let policy = TolerancePolicy::builder()
        .abs(0.0)
        .rel(0.0)
        .override_path(
            "$.b",
            PolicyOverride {
                abs: Some(100.0),
                ..PolicyOverride::default()
            },
        )
        .build()
        .expect("valid policy");

    // The override names `$.b`, but the numeric leaf lives at `$.b.c`.
    let result = compare(
        &value(json!({"b": {"c": 1.0}})),
        &value(json!({"b": {"c": 2.0}})),
        &policy,
    );
    assert!(!result.ok());

    let with_child = TolerancePolicy::builder()
        .abs(0.0)
        .rel(0.0)
        .override_path(
            "$.b.c",
            PolicyOverride {
                abs: Some(100.0),
                ..PolicyOverride::default()
            },
        )
        .build()
        .expect("valid policy");
    let result = compare(
        &value(json!({"b": {"c": 1.0}})),
        &value(json!({"b": {"c": 2.0}})),
        &with_child,
    );
    assert!(result.ok());
}

#[test_case(f64::NAN, f64::NAN, true, false, true; "nan equal when permitted")]
#[test_case(f64::NAN, f64::NAN, false, false, false; "nan unequal by default")]
#[test_case(f64::INFINITY, f64::INFINITY, false, true, true; "inf equal when permitted")]
#[test_case(f64::INFINITY, f64::NEG_INFINITY, false, true, false; "inf sign matters")]
#[test_case(f64::INFINITY, f64::INFINITY, false, false, false; "inf unequal by default")]
#[test_case(f64::INFINITY, 1.0, false, true, false; "inf vs finite fails")]
fn non_finite_policy_matrix(a: f64, b: f64, nan_equal: bool, inf_equal: bool, ok: bool) {
    let policy = TolerancePolicy::builder()
        .abs(f64::MAX)
        .rel(f64::MAX)
        .nan_equal(nan_equal)
        .inf_equal(inf_equal)
        .build()
        .expect("valid policy");
    let result = compare(&Value::Float(a), &Value::Float(b), &policy);
    assert_eq!(result.ok(), ok);
}

#[test]
fn end_to_end_scenario() {
    let original = value(json!({"x": 1.0, "y": [2.0, 3.0]}));
    let encoded = canonicalize(&original).expect("encodes");
    assert_eq!(encoded, "{\"x\":1.0,\"y\":[2.0,3.0]}");

    let decoded: Value = encoded.parse().expect("canonical form parses");
    let result = compare(&original, &decoded, &exact());
    assert!(result.ok());
    assert!(raise_on_mismatch(&result, Some("round trip")).is_ok());
}

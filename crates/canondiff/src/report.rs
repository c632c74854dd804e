//! Rendering of comparison results for humans, test harnesses, and CLIs.

use std::fmt::Write;

use crate::{compare::ComparisonResult, error::AssertionFailure};

/// Process exit code for a comparison with no mismatches.
pub const EXIT_OK: i32 = 0;
/// Process exit code for a comparison that found mismatches.
pub const EXIT_MISMATCH: i32 = 2;
/// Process exit code for usage, I/O, or encoding errors. Distinct from
/// [`EXIT_MISMATCH`] so "assertions failed" is separable from "tool broke".
pub const EXIT_ERROR: i32 = 3;

/// Renders a deterministic one-line header plus one bullet per mismatch.
///
/// `max_examples` caps the number of rendered bullets; truncation is stated
/// explicitly in a trailing `... and K more` line, never silent.
#[must_use]
pub fn format_summary(result: &ComparisonResult, max_examples: Option<usize>) -> String {
    let mismatches = result.mismatches();
    let mut out = if result.ok() {
        String::from("OK (mismatches=0)")
    } else {
        format!("FAIL (mismatches={})", mismatches.len())
    };
    let shown = max_examples.unwrap_or(mismatches.len()).min(mismatches.len());
    for mismatch in &mismatches[..shown] {
        let _ = write!(
            out,
            "\n- {}: {} (a={}, b={}",
            mismatch.path, mismatch.reason, mismatch.expected, mismatch.actual
        );
        if let Some(details) = &mismatch.details {
            let _ = write!(out, ", {details}");
        }
        out.push(')');
    }
    let hidden = mismatches.len() - shown;
    if hidden > 0 {
        let _ = write!(out, "\n... and {hidden} more");
    }
    out
}

/// Turns a failed comparison into an error for test-harness integration.
///
/// The failure message is exactly [`format_summary`] output, prefixed by
/// `"{prefix}:\n"` when a prefix is given.
///
/// # Errors
///
/// Returns [`AssertionFailure`] iff the result contains mismatches.
pub fn raise_on_mismatch(
    result: &ComparisonResult,
    prefix: Option<&str>,
) -> Result<(), AssertionFailure> {
    if result.ok() {
        return Ok(());
    }
    let summary = format_summary(result, None);
    let message = match prefix {
        Some(prefix) => format!("{prefix}:\n{summary}"),
        None => summary,
    };
    Err(AssertionFailure::new(message))
}

/// The exit code a CLI wrapper should use for this result.
#[must_use]
pub fn exit_code(result: &ComparisonResult) -> i32 {
    if result.ok() {
        EXIT_OK
    } else {
        EXIT_MISMATCH
    }
}

/// Machine-readable report: `{ok, mismatches: [...], stats: {...}}`.
///
/// Mismatch paths serialize as their rendered strings, so the report is
/// stable across runs for equal inputs.
#[must_use]
pub fn to_json(result: &ComparisonResult) -> serde_json::Value {
    serde_json::to_value(result).unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::{exit_code, format_summary, raise_on_mismatch, to_json, EXIT_MISMATCH, EXIT_OK};
    use crate::{compare::compare, policy::TolerancePolicy, value::Value};
    use serde_json::json;

    fn diff(expected: serde_json::Value, actual: serde_json::Value) -> crate::ComparisonResult {
        compare(
            &Value::from(expected),
            &Value::from(actual),
            &TolerancePolicy::exact(),
        )
    }

    #[test]
    fn ok_summary_is_one_line() {
        let result = diff(json!({"a": 1}), json!({"a": 1}));
        assert_eq!(format_summary(&result, None), "OK (mismatches=0)");
        assert_eq!(exit_code(&result), EXIT_OK);
    }

    #[test]
    fn fail_summary_lists_bullets_in_path_order() {
        let result = diff(json!({"b": 1, "a": "x"}), json!({"b": 2, "a": "y"}));
        let summary = format_summary(&result, None);
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines[0], "FAIL (mismatches=2)");
        assert_eq!(lines[1], "- $.a: value mismatch (a=\"x\", b=\"y\")");
        assert!(lines[2].starts_with("- $.b: value mismatch (abs="));
        assert_eq!(exit_code(&result), EXIT_MISMATCH);
    }

    #[test]
    fn truncation_is_explicit() {
        let result = diff(json!([1, 2, 3, 4]), json!([9, 9, 9, 9]));
        let summary = format_summary(&result, Some(2));
        assert!(summary.ends_with("... and 2 more"));
        assert_eq!(summary.lines().count(), 4);
    }

    #[test]
    fn raise_on_mismatch_prefixes_the_summary() {
        let result = diff(json!(1), json!(2));
        let failure = raise_on_mismatch(&result, Some("benchmark drift")).expect_err("must fail");
        assert!(failure.message().starts_with("benchmark drift:\nFAIL (mismatches=1)"));
        assert!(raise_on_mismatch(&diff(json!(1), json!(1)), None).is_ok());
    }

    #[test]
    fn json_report_shape() {
        let result = diff(json!({"a": 1}), json!({}));
        let report = to_json(&result);
        assert_eq!(report["ok"], json!(false));
        assert_eq!(report["mismatches"][0]["path"], json!("$.a"));
        assert_eq!(report["mismatches"][0]["reason"]["kind"], json!("missing_key"));
        assert_eq!(report["stats"]["leaves_compared"], json!(0));
    }
}

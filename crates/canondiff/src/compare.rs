//! Recursive structural diff with numeric tolerances.
//!
//! The comparator walks `expected` and `actual` in lockstep, emitting every
//! divergence as a [`Mismatch`] with a stable path. Traversal is depth-first
//! with object keys visited in sorted order and array indices ascending, so
//! the mismatch list order equals the total order over rendered paths and
//! two equal inputs always produce byte-identical reports.

use core::fmt;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    canonical::render_for_report,
    paths::Path,
    policy::{EffectivePolicy, TolerancePolicy},
    value::Value,
};

// Floor for the relative-difference denominator; avoids division by zero
// when both operands are exactly zero.
const REL_DENOM_FLOOR: f64 = 1e-300;

/// Why two values at one path were considered unequal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MismatchReason {
    /// The values belong to different, non-numeric-compatible variants.
    TypeMismatch,
    /// Container lengths differ.
    ShapeMismatch { expected_len: usize, actual_len: usize },
    /// A key present in `expected` is absent from `actual`.
    MissingKey,
    /// A key present in `actual` is absent from `expected`.
    UnexpectedKey,
    /// Leaf values differ. Diffs are `None` for non-numeric leaves and
    /// infinite for NaN/infinity policy failures.
    ValueMismatch {
        abs_diff: Option<f64>,
        rel_diff: Option<f64>,
    },
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchReason::TypeMismatch => f.write_str("type mismatch"),
            MismatchReason::ShapeMismatch {
                expected_len,
                actual_len,
            } => write!(f, "shape mismatch (len {expected_len} vs {actual_len})"),
            MismatchReason::MissingKey => f.write_str("missing key"),
            MismatchReason::UnexpectedKey => f.write_str("unexpected key"),
            MismatchReason::ValueMismatch {
                abs_diff: Some(abs),
                rel_diff: Some(rel),
            } => write!(f, "value mismatch (abs={abs:.3e}, rel={rel:.3e})"),
            MismatchReason::ValueMismatch { .. } => f.write_str("value mismatch"),
        }
    }
}

/// One discovered point of inequality, never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mismatch {
    pub path: Path,
    pub reason: MismatchReason,
    /// Canonical rendering of the expected value (`<absent>` for keys that
    /// exist only on the actual side).
    pub expected: String,
    /// Canonical rendering of the actual value.
    pub actual: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Aggregate statistics over one comparison run.
///
/// Maximum diffs are tracked across all numeric leaves, passing ones
/// included, so a run that barely fits its tolerances is visible as such.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ComparisonStats {
    pub leaves_compared: usize,
    pub max_abs_diff: f64,
    pub max_rel_diff: f64,
}

impl ComparisonStats {
    fn record(&mut self, abs_diff: f64, rel_diff: f64) {
        self.max_abs_diff = self.max_abs_diff.max(abs_diff);
        self.max_rel_diff = self.max_rel_diff.max(rel_diff);
    }
}

/// The terminal output of one [`compare`] call.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    ok: bool,
    mismatches: Vec<Mismatch>,
    stats: ComparisonStats,
}

impl ComparisonResult {
    /// True iff no mismatches were found.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.ok
    }

    /// All mismatches, ordered by the total order over rendered paths.
    #[must_use]
    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    #[must_use]
    pub fn stats(&self) -> &ComparisonStats {
        &self.stats
    }
}

enum Task<'a> {
    Compare {
        expected: &'a Value,
        actual: &'a Value,
        path: Path,
    },
    Emit(Mismatch),
}

/// Compares `expected` against `actual` under `policy`.
///
/// Never panics on well-formed input; divergences are reported as
/// [`Mismatch`] entries and one bad subtree does not stop discovery
/// elsewhere. Iterates with an explicit work stack, so arbitrarily deep
/// inputs are safe.
#[must_use]
pub fn compare(expected: &Value, actual: &Value, policy: &TolerancePolicy) -> ComparisonResult {
    let mut mismatches = Vec::new();
    let mut stats = ComparisonStats::default();
    let mut stack = vec![Task::Compare {
        expected,
        actual,
        path: Path::root(),
    }];

    while let Some(task) = stack.pop() {
        match task {
            Task::Emit(mismatch) => mismatches.push(mismatch),
            Task::Compare {
                expected,
                actual,
                path,
            } => compare_at(expected, actual, path, policy, &mut stack, &mut mismatches, &mut stats),
        }
    }
    ComparisonResult {
        ok: mismatches.is_empty(),
        mismatches,
        stats,
    }
}

fn compare_at<'a>(
    expected: &'a Value,
    actual: &'a Value,
    path: Path,
    policy: &TolerancePolicy,
    stack: &mut Vec<Task<'a>>,
    mismatches: &mut Vec<Mismatch>,
    stats: &mut ComparisonStats,
) {
    if expected.is_number() && actual.is_number() {
        stats.leaves_compared += 1;
        let effective = policy.resolve(&path);
        if let Some(mismatch) = compare_numeric(expected, actual, path, &effective, stats) {
            mismatches.push(mismatch);
        }
        return;
    }
    match (expected, actual) {
        (Value::Null, Value::Null) => {
            stats.leaves_compared += 1;
        }
        (Value::Bool(a), Value::Bool(b)) => {
            stats.leaves_compared += 1;
            if a != b {
                mismatches.push(plain_value_mismatch(expected, actual, path));
            }
        }
        (Value::String(a), Value::String(b)) => {
            stats.leaves_compared += 1;
            if a != b {
                mismatches.push(plain_value_mismatch(expected, actual, path));
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            if a.len() != b.len() {
                mismatches.push(Mismatch {
                    path: path.clone(),
                    reason: MismatchReason::ShapeMismatch {
                        expected_len: a.len(),
                        actual_len: b.len(),
                    },
                    expected: render_for_report(expected),
                    actual: render_for_report(actual),
                    details: None,
                });
            }
            // A length mismatch does not suppress diffs in the shared prefix.
            let shared = a.len().min(b.len());
            for index in (0..shared).rev() {
                stack.push(Task::Compare {
                    expected: &a[index],
                    actual: &b[index],
                    path: path.child_index(index),
                });
            }
        }
        (Value::Object(a), Value::Object(b)) => {
            let a_map: BTreeMap<&str, &'a Value> =
                a.iter().map(|(k, v)| (k.as_str(), v)).collect();
            let b_map: BTreeMap<&str, &'a Value> =
                b.iter().map(|(k, v)| (k.as_str(), v)).collect();
            let mut union: Vec<&str> = a_map.keys().copied().collect();
            union.extend(b_map.keys().copied().filter(|k| !a_map.contains_key(*k)));
            union.sort_unstable();

            let mut tasks = Vec::with_capacity(union.len());
            for key in union {
                let child = path.child_field(key);
                match (a_map.get(key).copied(), b_map.get(key).copied()) {
                    (Some(value), None) => tasks.push(Task::Emit(Mismatch {
                        path: child,
                        reason: MismatchReason::MissingKey,
                        expected: render_for_report(value),
                        actual: String::from("<absent>"),
                        details: None,
                    })),
                    (None, Some(value)) => tasks.push(Task::Emit(Mismatch {
                        path: child,
                        reason: MismatchReason::UnexpectedKey,
                        expected: String::from("<absent>"),
                        actual: render_for_report(value),
                        details: None,
                    })),
                    (Some(expected), Some(actual)) => tasks.push(Task::Compare {
                        expected,
                        actual,
                        path: child,
                    }),
                    (None, None) => {}
                }
            }
            stack.extend(tasks.into_iter().rev());
        }
        _ => {
            mismatches.push(Mismatch {
                path,
                reason: MismatchReason::TypeMismatch,
                expected: render_for_report(expected),
                actual: render_for_report(actual),
                details: Some(format!(
                    "expected {}, got {}",
                    expected.type_name(),
                    actual.type_name()
                )),
            });
        }
    }
}

fn plain_value_mismatch(expected: &Value, actual: &Value, path: Path) -> Mismatch {
    Mismatch {
        path,
        reason: MismatchReason::ValueMismatch {
            abs_diff: None,
            rel_diff: None,
        },
        expected: render_for_report(expected),
        actual: render_for_report(actual),
        details: None,
    }
}

fn compare_numeric(
    expected: &Value,
    actual: &Value,
    path: Path,
    effective: &EffectivePolicy,
    stats: &mut ComparisonStats,
) -> Option<Mismatch> {
    let a = expected.as_f64()?;
    let b = actual.as_f64()?;

    if a.is_nan() || b.is_nan() {
        if a.is_nan() && b.is_nan() && effective.nan_equal {
            return None;
        }
        stats.record(f64::INFINITY, f64::INFINITY);
        return Some(numeric_mismatch(expected, actual, path, f64::INFINITY, f64::INFINITY));
    }
    if a.is_infinite() || b.is_infinite() {
        if effective.inf_equal && a == b {
            return None;
        }
        stats.record(f64::INFINITY, f64::INFINITY);
        return Some(numeric_mismatch(expected, actual, path, f64::INFINITY, f64::INFINITY));
    }

    let abs_diff = (a - b).abs();
    let rel_diff = abs_diff / a.abs().max(b.abs()).max(REL_DENOM_FLOOR);
    stats.record(abs_diff, rel_diff);
    // Either tolerance being satisfied is sufficient (logical OR).
    if abs_diff <= effective.abs || rel_diff <= effective.rel {
        return None;
    }
    Some(numeric_mismatch(expected, actual, path, abs_diff, rel_diff))
}

fn numeric_mismatch(
    expected: &Value,
    actual: &Value,
    path: Path,
    abs_diff: f64,
    rel_diff: f64,
) -> Mismatch {
    Mismatch {
        path,
        reason: MismatchReason::ValueMismatch {
            abs_diff: Some(abs_diff),
            rel_diff: Some(rel_diff),
        },
        expected: render_for_report(expected),
        actual: render_for_report(actual),
        details: None,
    }
}

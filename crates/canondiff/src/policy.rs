//! Numeric drift policies.
//!
//! A [`TolerancePolicy`] is built once per comparison run, validated
//! eagerly, and immutable afterwards; it is `Send + Sync` and may be shared
//! read-only across concurrent comparisons.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::{error::PolicyError, paths::Path};

/// Default absolute tolerance, matching the convention of the benchmark
/// tooling this crate serves.
pub const DEFAULT_ABS_TOL: f64 = 1e-8;
/// Default relative tolerance.
pub const DEFAULT_REL_TOL: f64 = 1e-6;

/// A partial policy attached to one exact rendered path.
///
/// Unset fields inherit from the root policy at resolution time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyOverride {
    pub abs: Option<f64>,
    pub rel: Option<f64>,
    pub nan_equal: Option<bool>,
    pub inf_equal: Option<bool>,
}

impl PolicyOverride {
    fn validate(&self) -> Result<(), PolicyError> {
        if let Some(abs) = self.abs {
            validate_abs(abs)?;
        }
        if let Some(rel) = self.rel {
            validate_rel(rel)?;
        }
        Ok(())
    }
}

/// The fully resolved tolerance tuple applied to one scalar comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectivePolicy {
    pub abs: f64,
    pub rel: f64,
    pub nan_equal: bool,
    pub inf_equal: bool,
}

/// Tolerances and numeric-equality flags governing a comparison run.
///
/// Per-path overrides apply only to the exact rendered path they name; an
/// override at `$.b` does not propagate to `$.b.c`. This favors explicitness
/// over implicit inheritance and is covered by tests.
///
/// Built through [`TolerancePolicy::builder`] only, so every instance has
/// passed tolerance validation.
#[derive(Debug, Clone, Serialize)]
pub struct TolerancePolicy {
    default_abs: f64,
    default_rel: f64,
    nan_equal: bool,
    inf_equal: bool,
    per_path: AHashMap<String, PolicyOverride>,
}

impl Default for TolerancePolicy {
    fn default() -> Self {
        TolerancePolicy {
            default_abs: DEFAULT_ABS_TOL,
            default_rel: DEFAULT_REL_TOL,
            nan_equal: false,
            inf_equal: false,
            per_path: AHashMap::new(),
        }
    }
}

impl TolerancePolicy {
    /// A policy with both tolerances at zero: numeric values must match
    /// exactly (NaN and infinities still fail under the default flags).
    #[must_use]
    pub fn exact() -> Self {
        TolerancePolicy {
            default_abs: 0.0,
            default_rel: 0.0,
            ..TolerancePolicy::default()
        }
    }

    #[must_use]
    pub fn builder() -> TolerancePolicyBuilder {
        TolerancePolicyBuilder::default()
    }

    /// Resolves the effective tolerance tuple for one leaf comparison.
    ///
    /// Looked up by the exact rendered path; a partial override inherits its
    /// unset fields from the root policy. Resolution happens once per
    /// scalar-vs-scalar comparison, never per container.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> EffectivePolicy {
        let defaults = EffectivePolicy {
            abs: self.default_abs,
            rel: self.default_rel,
            nan_equal: self.nan_equal,
            inf_equal: self.inf_equal,
        };
        match self.per_path.get(&path.render()) {
            Some(over) => EffectivePolicy {
                abs: over.abs.unwrap_or(defaults.abs),
                rel: over.rel.unwrap_or(defaults.rel),
                nan_equal: over.nan_equal.unwrap_or(defaults.nan_equal),
                inf_equal: over.inf_equal.unwrap_or(defaults.inf_equal),
            },
            None => defaults,
        }
    }
}

/// Builder for [`TolerancePolicy`]; validation happens in [`build`].
///
/// [`build`]: TolerancePolicyBuilder::build
#[derive(Debug, Clone)]
pub struct TolerancePolicyBuilder {
    abs: f64,
    rel: f64,
    nan_equal: bool,
    inf_equal: bool,
    per_path: AHashMap<String, PolicyOverride>,
}

impl Default for TolerancePolicyBuilder {
    fn default() -> Self {
        TolerancePolicyBuilder {
            abs: DEFAULT_ABS_TOL,
            rel: DEFAULT_REL_TOL,
            nan_equal: false,
            inf_equal: false,
            per_path: AHashMap::new(),
        }
    }
}

impl TolerancePolicyBuilder {
    #[must_use]
    pub fn abs(mut self, abs: f64) -> Self {
        self.abs = abs;
        self
    }

    #[must_use]
    pub fn rel(mut self, rel: f64) -> Self {
        self.rel = rel;
        self
    }

    #[must_use]
    pub fn nan_equal(mut self, yes: bool) -> Self {
        self.nan_equal = yes;
        self
    }

    #[must_use]
    pub fn inf_equal(mut self, yes: bool) -> Self {
        self.inf_equal = yes;
        self
    }

    /// Attaches a partial override to one exact rendered path, e.g. `$.x[0]`.
    #[must_use]
    pub fn override_path(mut self, path: impl Into<String>, over: PolicyOverride) -> Self {
        self.per_path.insert(path.into(), over);
        self
    }

    /// Validates and freezes the policy.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] if any tolerance (default or override) is
    /// negative or NaN. Invalid values are rejected, never clamped.
    pub fn build(self) -> Result<TolerancePolicy, PolicyError> {
        validate_abs(self.abs)?;
        validate_rel(self.rel)?;
        for over in self.per_path.values() {
            over.validate()?;
        }
        Ok(TolerancePolicy {
            default_abs: self.abs,
            default_rel: self.rel,
            nan_equal: self.nan_equal,
            inf_equal: self.inf_equal,
            per_path: self.per_path,
        })
    }
}

fn validate_abs(abs: f64) -> Result<(), PolicyError> {
    if abs >= 0.0 {
        Ok(())
    } else {
        Err(PolicyError::InvalidAbs(abs))
    }
}

fn validate_rel(rel: f64) -> Result<(), PolicyError> {
    if rel >= 0.0 {
        Ok(())
    } else {
        Err(PolicyError::InvalidRel(rel))
    }
}

#[cfg(test)]
mod tests {
    use super::{PolicyOverride, TolerancePolicy};
    use crate::{error::PolicyError, paths::Path};
    use test_case::test_case;

    #[test]
    fn defaults_resolve_everywhere() {
        let policy = TolerancePolicy::default();
        let effective = policy.resolve(&Path::root().child_field("x"));
        assert_eq!(effective.abs, super::DEFAULT_ABS_TOL);
        assert_eq!(effective.rel, super::DEFAULT_REL_TOL);
        assert!(!effective.nan_equal);
        assert!(!effective.inf_equal);
    }

    #[test]
    fn partial_override_inherits_unset_fields() {
        let policy = TolerancePolicy::builder()
            .abs(0.5)
            .rel(0.25)
            .nan_equal(true)
            .override_path(
                "$.x",
                PolicyOverride {
                    abs: Some(0.01),
                    ..PolicyOverride::default()
                },
            )
            .build()
            .expect("valid policy");
        let effective = policy.resolve(&Path::root().child_field("x"));
        assert_eq!(effective.abs, 0.01);
        assert_eq!(effective.rel, 0.25);
        assert!(effective.nan_equal);
    }

    #[test]
    fn override_is_exact_match_only() {
        let policy = TolerancePolicy::builder()
            .abs(0.0)
            .rel(0.0)
            .override_path(
                "$.b",
                PolicyOverride {
                    abs: Some(10.0),
                    ..PolicyOverride::default()
                },
            )
            .build()
            .expect("valid policy");
        let child = policy.resolve(&Path::root().child_field("b").child_field("c"));
        assert_eq!(child.abs, 0.0);
    }

    #[test_case(-1.0, 0.0)]
    #[test_case(f64::NAN, 0.0)]
    fn invalid_abs_rejected(abs: f64, rel: f64) {
        let err = TolerancePolicy::builder().abs(abs).rel(rel).build();
        assert!(matches!(err, Err(PolicyError::InvalidAbs(_))));
    }

    #[test]
    fn invalid_rel_rejected() {
        let err = TolerancePolicy::builder().abs(0.0).rel(-0.5).build();
        assert!(matches!(err, Err(PolicyError::InvalidRel(_))));
    }

    #[test]
    fn invalid_override_rejected() {
        let err = TolerancePolicy::builder()
            .override_path(
                "$.x",
                PolicyOverride {
                    rel: Some(-2.0),
                    ..PolicyOverride::default()
                },
            )
            .build();
        assert!(matches!(err, Err(PolicyError::InvalidRel(_))));
    }
}

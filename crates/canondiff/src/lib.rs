//! # canondiff
//!
//! Deterministic JSON canonicalization and tolerance-aware structural
//! comparison for benchmark and regression artifacts.
//!
//! The crate has two entry points:
//!
//! - [`canonicalize`] encodes a [`Value`] into one byte-stable canonical
//!   form (sorted keys, fixed separators, normalized floats), so artifacts
//!   written on different runs or platforms can be byte-compared.
//! - [`compare`] walks two values in lockstep and reports every divergence
//!   as an ordered [`Mismatch`] list, classifying numeric drift against a
//!   [`TolerancePolicy`].
//!
//! ```rust
//! use canondiff::{compare, canonicalize, TolerancePolicy, Value};
//!
//! let expected: Value = r#"{"y":[2.0,3.0],"x":1.0}"#.parse()?;
//! let actual: Value = r#"{"x":1.0000001,"y":[2.0,3.0]}"#.parse()?;
//!
//! assert_eq!(canonicalize(&expected)?, "{\"x\":1.0,\"y\":[2.0,3.0]}");
//!
//! let policy = TolerancePolicy::builder().abs(1e-6).rel(0.0).build()?;
//! let result = compare(&expected, &actual, &policy);
//! assert!(result.ok());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Both entry points are pure functions over immutable inputs; values and
//! policies are `Send + Sync` and may be shared across threads freely.

mod canonical;
mod compare;
mod error;
mod paths;
mod policy;
pub mod report;
mod value;

pub use canonical::{canonicalize, canonicalize_pretty, canonicalize_with, CanonicalOptions};
pub use compare::{compare, ComparisonResult, ComparisonStats, Mismatch, MismatchReason};
pub use error::{AssertionFailure, EncodeError, PolicyError};
pub use paths::{Path, PathSegment};
pub use policy::{
    EffectivePolicy, PolicyOverride, TolerancePolicy, TolerancePolicyBuilder, DEFAULT_ABS_TOL,
    DEFAULT_REL_TOL,
};
pub use report::{format_summary, raise_on_mismatch};
pub use value::Value;

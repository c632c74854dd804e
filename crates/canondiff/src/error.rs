use core::fmt;

use crate::paths::Path;

/// Errors produced by the canonical encoder.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodeError {
    /// A `NaN` or infinite float was encountered at the given path while
    /// non-finite values were not permitted.
    NonFinite(Path),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::NonFinite(path) => {
                write!(f, "non-finite float at {path} is not representable in canonical JSON")
            }
        }
    }
}

impl std::error::Error for EncodeError {}

/// Errors raised when constructing a [`TolerancePolicy`](crate::TolerancePolicy)
/// from invalid inputs. Invalid tolerances are rejected eagerly, never clamped.
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyError {
    /// The absolute tolerance was negative or NaN.
    InvalidAbs(f64),
    /// The relative tolerance was negative or NaN.
    InvalidRel(f64),
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyError::InvalidAbs(value) => {
                write!(f, "absolute tolerance must be a non-negative number, got {value}")
            }
            PolicyError::InvalidRel(value) => {
                write!(f, "relative tolerance must be a non-negative number, got {value}")
            }
        }
    }
}

impl std::error::Error for PolicyError {}

/// Comparison failure for test-harness integration, produced by
/// [`raise_on_mismatch`](crate::report::raise_on_mismatch).
///
/// Its `Display` output is the full mismatch summary, optionally prefixed by
/// the caller-provided context line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    message: String,
}

impl AssertionFailure {
    pub(crate) fn new(message: String) -> Self {
        AssertionFailure { message }
    }

    /// The full failure message, identical to `Display` output.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AssertionFailure {}

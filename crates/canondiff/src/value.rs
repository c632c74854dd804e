use core::fmt;
use std::str::FromStr;

/// An in-memory JSON-like value used by the canonicalizer and the comparator.
///
/// Objects preserve insertion order for input fidelity, but canonical output
/// always sorts keys, so two logically equal objects built in different
/// orders encode identically.
///
/// Integers are kept distinct from floats so type mismatches against
/// non-numeric values can be reported precisely, yet `Int` and `Float` form
/// one numeric family for comparison purposes. Integers with magnitude above
/// 2^53 lose precision when compared, as both sides are widened to `f64`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Human-readable name of the variant, used in mismatch details.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Whether this value is `Int` or `Float`.
    ///
    /// The comparator treats the two as one family: `1` vs `1.0` is a
    /// numeric comparison, not a type mismatch.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Numeric view of this value, if it is in the numeric family.
    #[must_use]
    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => {
                // Documented limitation: integers above 2^53 lose precision.
                #[allow(clippy::cast_precision_loss)]
                let widened = *i as f64;
                Some(widened)
            }
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Builds an `Object` from key/value pairs, de-duplicating keys with
    /// last-write-wins semantics (matching common JSON parser behavior).
    #[must_use]
    pub fn object(pairs: impl IntoIterator<Item = (String, Value)>) -> Value {
        let mut entries: Vec<(String, Value)> = Vec::new();
        for (key, value) in pairs {
            if let Some(slot) = entries.iter_mut().find(|(existing, _)| *existing == key) {
                slot.1 = value;
            } else {
                entries.push((key, value));
            }
        }
        Value::Object(entries)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    // Above i64::MAX; degrade to float with the usual 2^53 caveat.
                    #[allow(clippy::cast_precision_loss)]
                    let widened = u as f64;
                    Value::Float(widened)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                // serde_json has already applied last-write-wins to duplicates.
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl FromStr for Value {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str::<serde_json::Value>(s).map(Value::from)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::canonical::render_for_report(self))
    }
}

//! Canonical JSON encoding.
//!
//! One deterministic byte encoding per logical [`Value`]: keys sorted by
//! UTF-8 byte value, fixed separators, shortest round-trippable float form,
//! `-0.0` normalized to `0.0`, UTF-8 passthrough for non-ASCII. The output
//! of repeated runs over equal inputs is byte-identical, which makes
//! on-disk artifacts comparable with a plain byte check.

use crate::{
    error::EncodeError,
    paths::{Path, PathSegment},
    value::Value,
};

/// Configuration of the canonical encoder.
///
/// The default encodes the strict compact form: non-finite floats are
/// rejected, no rounding, no whitespace.
#[derive(Debug, Clone, Default)]
pub struct CanonicalOptions {
    allow_non_finite: bool,
    round_decimals: Option<u32>,
    pretty: bool,
}

impl CanonicalOptions {
    #[must_use]
    pub fn new() -> Self {
        CanonicalOptions::default()
    }

    /// Permit NaN and infinities, encoding them as the reserved strings
    /// `"NaN"`, `"Infinity"` and `"-Infinity"`.
    ///
    /// This is not standard JSON; it exists for diagnostic output where
    /// losing the value would hide the interesting part of a report.
    #[must_use]
    pub fn allow_non_finite(mut self, yes: bool) -> Self {
        self.allow_non_finite = yes;
        self
    }

    /// Round floats to `decimals` decimal places before encoding.
    ///
    /// Rounding happens before `-0.0` normalization, so a negative value
    /// that rounds to zero encodes as `0.0`, never `-0.0`. The default is
    /// no rounding: floats encode with full round-trippable precision.
    #[must_use]
    pub fn round_decimals(mut self, decimals: u32) -> Self {
        self.round_decimals = Some(decimals);
        self
    }

    /// Emit the human-readable form: 2-space indent, one member per line.
    ///
    /// Keys are sorted exactly as in the compact form, and both forms decode
    /// back to the same logical value.
    #[must_use]
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }
}

/// Encodes `value` into the strict compact canonical form.
///
/// # Errors
///
/// Returns [`EncodeError::NonFinite`] if the value contains NaN or an
/// infinity, with the path of the offending float.
pub fn canonicalize(value: &Value) -> Result<String, EncodeError> {
    canonicalize_with(value, &CanonicalOptions::default())
}

/// Encodes `value` into the pretty canonical form (2-space indent).
///
/// # Errors
///
/// Returns [`EncodeError::NonFinite`] if the value contains NaN or an
/// infinity, with the path of the offending float.
pub fn canonicalize_pretty(value: &Value) -> Result<String, EncodeError> {
    canonicalize_with(value, &CanonicalOptions::new().pretty(true))
}

enum Task<'a> {
    Value { value: &'a Value, depth: usize },
    // Escaped key plus separator; in pretty mode also the line lead-in.
    Key { key: &'a str, depth: usize },
    // Line lead-in for a pretty-mode array item.
    Item { depth: usize },
    Text(&'static str),
    Close { token: &'static str, depth: usize },
    PushField(&'a str),
    PushIndex(usize),
    PopPath,
}

/// Encodes `value` with explicit options.
///
/// Uses an explicit work stack rather than native recursion, so deeply
/// nested inputs cannot overflow the call stack.
///
/// # Errors
///
/// Returns [`EncodeError::NonFinite`] for NaN/infinite floats unless
/// [`CanonicalOptions::allow_non_finite`] was set.
pub fn canonicalize_with(value: &Value, options: &CanonicalOptions) -> Result<String, EncodeError> {
    let mut out = String::new();
    let mut path: Vec<PathSegment> = Vec::new();
    let mut stack: Vec<Task<'_>> = vec![Task::Value { value, depth: 0 }];

    while let Some(task) = stack.pop() {
        match task {
            Task::Value { value, depth } => match value {
                Value::Null => out.push_str("null"),
                Value::Bool(true) => out.push_str("true"),
                Value::Bool(false) => out.push_str("false"),
                Value::Int(i) => {
                    let mut buffer = itoa::Buffer::new();
                    out.push_str(buffer.format(*i));
                }
                Value::Float(f) => write_float(&mut out, *f, options, &path)?,
                Value::String(s) => write_escaped(&mut out, s),
                Value::Array(items) => {
                    if items.is_empty() {
                        out.push_str("[]");
                    } else {
                        out.push('[');
                        push_array_tasks(&mut stack, items, depth, options.pretty);
                    }
                }
                Value::Object(entries) => {
                    if entries.is_empty() {
                        out.push_str("{}");
                    } else {
                        out.push('{');
                        push_object_tasks(&mut stack, entries, depth, options.pretty);
                    }
                }
            },
            Task::Key { key, depth } => {
                if options.pretty {
                    write_indent(&mut out, depth);
                    write_escaped(&mut out, key);
                    out.push_str(": ");
                } else {
                    write_escaped(&mut out, key);
                    out.push(':');
                }
            }
            Task::Item { depth } => write_indent(&mut out, depth),
            Task::Text(text) => out.push_str(text),
            Task::Close { token, depth } => {
                if options.pretty {
                    write_indent(&mut out, depth);
                }
                out.push_str(token);
            }
            Task::PushField(name) => path.push(PathSegment::Field(name.to_string())),
            Task::PushIndex(index) => path.push(PathSegment::Index(index)),
            Task::PopPath => {
                path.pop();
            }
        }
    }
    Ok(out)
}

fn push_array_tasks<'a>(
    stack: &mut Vec<Task<'a>>,
    items: &'a [Value],
    depth: usize,
    pretty: bool,
) {
    let mut tasks = Vec::with_capacity(items.len() * 4 + 1);
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            tasks.push(Task::Text(","));
        }
        tasks.push(Task::PushIndex(index));
        if pretty {
            tasks.push(Task::Item { depth: depth + 1 });
        }
        tasks.push(Task::Value {
            value: item,
            depth: depth + 1,
        });
        tasks.push(Task::PopPath);
    }
    tasks.push(Task::Close { token: "]", depth });
    stack.extend(tasks.into_iter().rev());
}

fn push_object_tasks<'a>(
    stack: &mut Vec<Task<'a>>,
    entries: &'a [(String, Value)],
    depth: usize,
    pretty: bool,
) {
    let mut sorted: Vec<&(String, Value)> = entries.iter().collect();
    sorted.sort_unstable_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));

    let mut tasks = Vec::with_capacity(sorted.len() * 4 + 1);
    for (position, (key, value)) in sorted.into_iter().enumerate() {
        if position > 0 {
            tasks.push(Task::Text(","));
        }
        tasks.push(Task::PushField(key.as_str()));
        tasks.push(Task::Key {
            key: key.as_str(),
            depth: depth + 1,
        });
        tasks.push(Task::Value {
            value,
            depth: depth + 1,
        });
        tasks.push(Task::PopPath);
    }
    tasks.push(Task::Close { token: "}", depth });
    stack.extend(tasks.into_iter().rev());
}

fn write_indent(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn write_float(
    out: &mut String,
    value: f64,
    options: &CanonicalOptions,
    path: &[PathSegment],
) -> Result<(), EncodeError> {
    let mut value = value;
    if let Some(decimals) = options.round_decimals {
        if value.is_finite() {
            #[allow(clippy::cast_possible_wrap)]
            let factor = 10f64.powi(decimals as i32);
            let rounded = (value * factor).round() / factor;
            // Huge magnitudes overflow the scaled intermediate; they have no
            // fractional part to round anyway, so keep the original.
            if rounded.is_finite() {
                value = rounded;
            }
        }
    }
    if !value.is_finite() {
        if options.allow_non_finite {
            if value.is_nan() {
                out.push_str("\"NaN\"");
            } else if value > 0.0 {
                out.push_str("\"Infinity\"");
            } else {
                out.push_str("\"-Infinity\"");
            }
            return Ok(());
        }
        return Err(EncodeError::NonFinite(Path::from_segments(path.to_vec())));
    }
    // Normalize after rounding so values that round to zero never encode
    // as negative zero.
    if value == 0.0 {
        value = 0.0;
    }
    let mut buffer = ryu::Buffer::new();
    out.push_str(buffer.format_finite(value));
    Ok(())
}

fn write_escaped(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            ch if (ch as u32) < 0x20 => {
                const HEX: &[u8; 16] = b"0123456789abcdef";
                let code = ch as u32;
                out.push_str("\\u00");
                out.push(HEX[(code >> 4) as usize] as char);
                out.push(HEX[(code & 0xF) as usize] as char);
            }
            ch => out.push(ch),
        }
    }
    out.push('"');
}

/// Compact rendering that never fails, for mismatch messages. Non-finite
/// floats fall back to their reserved string tokens.
pub(crate) fn render_for_report(value: &Value) -> String {
    let options = CanonicalOptions::new().allow_non_finite(true);
    match canonicalize_with(value, &options) {
        Ok(rendered) => rendered,
        // Unreachable once non-finite values are permitted.
        Err(_) => String::from("<unrenderable>"),
    }
}

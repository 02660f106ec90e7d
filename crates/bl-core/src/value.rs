//! Scalar helpers shared by every derivation and predicate
//!
//! Records carry arbitrary JSON values. Charts only ever need a handful of
//! operations on them: blank detection, numeric coercion, a hashable identity
//! and a total ordering for sorted entity lists.

use std::cmp::Ordering;

use serde_json::Value;

/// Absent, `null` and `""` never name an entity, group or category
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Coerce a value to a number the way a numeric field is read
///
/// Numbers pass through, numeric strings are parsed, booleans count as 1/0.
/// Everything else (including blanks) is not a number.
pub fn as_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Sum the numeric readings of a field, skipping values that are not numbers
pub fn sum<'a>(values: impl IntoIterator<Item = Option<&'a Value>>) -> f64 {
    values.into_iter().filter_map(as_number).sum()
}

/// Hashable identity of a value: its canonical JSON encoding
///
/// `"1"` and `1` stay distinct entities.
pub fn identity(value: &Value) -> String {
    value.to_string()
}

/// Human readable label: strings verbatim, anything else as JSON text
pub fn label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Ascending order used for sorted entity lists
///
/// Numbers sort before strings, numbers numerically, strings
/// lexicographically; remaining kinds fall back to their encoding.
pub fn ascending(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)).then_with(|| identity(a).cmp(&identity(b))),
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

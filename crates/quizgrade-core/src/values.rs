//! Coercions applied at the boundary between opaque JSON payloads and the
//! typed views handlers work with.

use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use serde_json::Value;

/// Interpret a heterogeneous correctness flag.
///
/// `true`, `1`, `"1"` and `"true"` (any case) are truthy; everything else,
/// including `null`, is falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => {
            let s = s.trim();
            s == "1" || s.eq_ignore_ascii_case("true")
        }
        _ => false,
    }
}

/// Serde adapter for fields holding a boolean-like flag.
pub fn deserialize_truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(is_truthy(&value))
}

/// Serde adapter for optional boolean-like flags.
pub fn deserialize_opt_truthy<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|v| is_truthy(&v)))
}

/// Serde adapter for free-text fields. Scalars are rendered as text; `null`
/// and containers read as empty.
pub fn deserialize_lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value).unwrap_or_default())
}

/// Serde adapter for lists of text. Non-scalar entries are dropped and a
/// non-list value reads as empty.
pub fn deserialize_text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_array()
        .map(|items| items.iter().filter_map(scalar_text).collect())
        .unwrap_or_default())
}

/// A number, or a string holding one.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Deterministic identifier for the item at `position`: `0 -> "a"`,
/// `25 -> "z"`, `26 -> "aa"`, `27 -> "ab"`.
pub fn position_id(position: usize) -> String {
    let mut n = position;
    let mut letters = Vec::new();
    loop {
        letters.push(b'a' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Render a scalar as text the way a learner typed it. Containers yield
/// `None`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Interpret a scalar as a non-negative position index. Numeric strings
/// count; fractional values are truncated.
pub fn as_index(value: &Value) -> Option<usize> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if n.is_finite() && n >= 0.0 {
        Some(n.trunc() as usize)
    } else {
        None
    }
}

/// Parse a typed view, falling back to its default when the payload has the
/// wrong shape.
pub fn parse_or_default<T: DeserializeOwned + Default>(value: &Value) -> T {
    T::deserialize(value).unwrap_or_default()
}

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_from_numeric_strings() {
        assert_eq!(as_number(&json!(2)), Some(2.0));
        assert_eq!(as_number(&json!(" 2.5 ")), Some(2.5));
        assert_eq!(as_number(&json!("two")), None);
        assert_eq!(as_number(&json!(null)), None);
    }

    #[test]
    fn truthy_values() {
        for v in [json!(true), json!(1), json!("1"), json!("true"), json!("TRUE")] {
            assert!(is_truthy(&v), "{v} should be truthy");
        }
        for v in [
            json!(false),
            json!(0),
            json!("0"),
            json!("false"),
            json!("yes"),
            json!(null),
            json!(2),
            json!([]),
        ] {
            assert!(!is_truthy(&v), "{v} should be falsy");
        }
    }

    #[test]
    fn position_ids() {
        assert_eq!(position_id(0), "a");
        assert_eq!(position_id(3), "d");
        assert_eq!(position_id(25), "z");
        assert_eq!(position_id(26), "aa");
        assert_eq!(position_id(27), "ab");
        assert_eq!(position_id(52), "ba");
    }

    #[test]
    fn index_parsing() {
        assert_eq!(as_index(&json!(2)), Some(2));
        assert_eq!(as_index(&json!("1")), Some(1));
        assert_eq!(as_index(&json!(1.9)), Some(1));
        assert_eq!(as_index(&json!(-1)), None);
        assert_eq!(as_index(&json!("b")), None);
    }

    #[test]
    fn rounding() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(12.344), 12.34);
        assert_eq!(round2(100.0), 100.0);
    }
}

//! Lenient numeric parsing for values captured through forms
//!
//! Quantities and prices arrive from the data store as JSON numbers, but
//! older records captured through spreadsheet imports carry them as strings
//! with Swiss decimal commas and stray whitespace. Parsing is total: any
//! value that cannot be read as a finite number becomes 0.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Convert a JSON value into a finite `f64`.
///
/// Strings are stripped of whitespace and a decimal comma is normalized to
/// a dot before parsing. Non-finite results and non-numeric values map
/// to 0.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
        Value::String(s) => {
            let cleaned: String =
                s.chars().filter(|c| !c.is_whitespace()).map(|c| if c == ',' { '.' } else { c }).collect();
            cleaned.parse::<f64>().ok().filter(|f| f.is_finite()).unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

/// Serde helper deserializing a number-or-string field via [`to_number`].
///
/// Missing fields still need `#[serde(default)]` on the field itself.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(to_number(&value))
}

/// Serde helper for optional number-or-string fields.
pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().filter(|v| !v.is_null()).map(to_number))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(to_number(&json!(12.5)), 12.5);
        assert_eq!(to_number(&json!(0)), 0.0);
        assert_eq!(to_number(&json!(-3)), -3.0);
    }

    #[test]
    fn parses_numeric_strings_with_comma_and_whitespace() {
        assert_eq!(to_number(&json!("12,5")), 12.5);
        assert_eq!(to_number(&json!(" 1 234,75 ")), 1234.75);
        assert_eq!(to_number(&json!("8.1")), 8.1);
    }

    #[test]
    fn non_numeric_input_becomes_zero() {
        assert_eq!(to_number(&json!("zwölf")), 0.0);
        assert_eq!(to_number(&json!("")), 0.0);
        assert_eq!(to_number(&json!(null)), 0.0);
        assert_eq!(to_number(&json!({"a": 1})), 0.0);
        assert_eq!(to_number(&json!(true)), 0.0);
    }

    #[test]
    fn lenient_field_accepts_both_shapes() {
        #[derive(serde::Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "super::lenient_f64")]
            quantity: f64,
        }

        let from_number: Row = serde_json::from_value(json!({"quantity": 7})).unwrap();
        assert_eq!(from_number.quantity, 7.0);

        let from_string: Row = serde_json::from_value(json!({"quantity": "7,25"})).unwrap();
        assert_eq!(from_string.quantity, 7.25);
    }
}

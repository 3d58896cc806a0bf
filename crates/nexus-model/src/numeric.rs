//! Numeric coercion and formatting for record fields.

use serde_json::Value;

/// Parses a string as f64, returning None for invalid or empty strings.
pub fn parse_f64_str(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Coerces a record field to f64.
///
/// Numbers convert directly and strings are parsed after trimming. Null,
/// booleans, mappings and sequences never parse.
pub fn parse_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_f64_str(text),
        _ => None,
    }
}

/// Formats a reading so integral values keep one decimal place (`23.0`).
///
/// Magnitudes below `1e-4` or from `1e16` up switch to exponent form with a
/// signed two-digit exponent (`1e-05`, `1.5e+20`). Non-finite values render
/// as `inf`, `-inf` and `nan`.
pub fn format_numeric(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if v != 0.0 {
        let scientific = format!("{v:e}");
        if let Some((mantissa, exponent)) = scientific.split_once('e')
            && let Ok(exponent) = exponent.parse::<i32>()
            && !(-4..16).contains(&exponent)
        {
            let sign = if exponent < 0 { '-' } else { '+' };
            return format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs());
        }
    }
    if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Converts a computed value into a record field.
///
/// Finite values become JSON numbers. Non-finite values have no JSON number
/// form and are kept as their [`format_numeric`] text, which [`parse_f64`]
/// reads back.
pub fn numeric_value(v: f64) -> Value {
    if v.is_finite() {
        Value::from(v)
    } else {
        Value::String(format_numeric(v))
    }
}

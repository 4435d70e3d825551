//! Best-effort coercion of loosely typed feed values

use serde_json::{Number, Value};

/// Render a feed value the way the upstream producer prints it:
/// strings bare, null as `None`, booleans capitalised, floats keep a decimal point.
pub fn display_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null      => "None".to_string(),
        Value::Bool(b)   => if *b { "True".to_string() } else { "False".to_string() },
        Value::Number(n) => number_label(n),
        other            => other.to_string(),
    }
}

/// `3` stays `3`, `3.0` stays `3.0`, `3.25` stays `3.25`.
/// Floats with a decimal exponent below -4 or from 16 up switch to `1e+16` / `1e-05` form.
pub fn number_label(n: &Number) -> String {
    if !n.is_f64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => float_label(f),
        _ => n.to_string(),
    }
}

fn float_label(f: f64) -> String {
    let sci = format!("{f:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return f.to_string();
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    if !(-4..16).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    } else if f.fract() == 0.0 {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

/// Score coercion. Absent or null counts as 0, floats truncate, numeric strings parse.
/// `None` means the value cannot be read as a score at all.
pub fn coerce_score(v: Option<&Value>) -> Option<i64> {
    match v {
        None | Some(Value::Null) => Some(0),
        Some(Value::Bool(b)) => Some(i64::from(*b)),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    }
}

/// Numeric value of an over/under line; strings and other shapes are not lines.
pub fn line_value(v: Option<&Value>) -> Option<f64> {
    v.and_then(Value::as_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_matches_feed_rendering() {
        assert_eq!(display_value(&json!("1.85")), "1.85");
        assert_eq!(display_value(&json!(null)), "None");
        assert_eq!(display_value(&json!(true)), "True");
        assert_eq!(display_value(&json!(3)), "3");
        assert_eq!(display_value(&json!(3.0)), "3.0");
        assert_eq!(display_value(&json!(3.25)), "3.25");
        assert_eq!(display_value(&json!(-110)), "-110");
    }

    #[test]
    fn extreme_floats_use_exponent_form() {
        assert_eq!(display_value(&json!(1e16)), "1e+16");
        assert_eq!(display_value(&json!(1.5e16)), "1.5e+16");
        assert_eq!(display_value(&json!(9999999999999998.0)), "9999999999999998.0");
        assert_eq!(display_value(&json!(0.0001)), "0.0001");
        assert_eq!(display_value(&json!(0.00001)), "1e-05");
        assert_eq!(display_value(&json!(-2.5e-7)), "-2.5e-07");
        assert_eq!(display_value(&json!(0.0)), "0.0");
    }

    #[test]
    fn scores_coerce_leniently() {
        assert_eq!(coerce_score(None), Some(0));
        assert_eq!(coerce_score(Some(&json!(null))), Some(0));
        assert_eq!(coerce_score(Some(&json!(2))), Some(2));
        assert_eq!(coerce_score(Some(&json!(0.0))), Some(0));
        assert_eq!(coerce_score(Some(&json!(1.9))), Some(1));
        assert_eq!(coerce_score(Some(&json!(" 0 "))), Some(0));
        assert_eq!(coerce_score(Some(&json!("1"))), Some(1));
    }

    #[test]
    fn unreadable_scores_are_none() {
        assert_eq!(coerce_score(Some(&json!("0.0"))), None);
        assert_eq!(coerce_score(Some(&json!("nil"))), None);
        assert_eq!(coerce_score(Some(&json!([0]))), None);
        assert_eq!(coerce_score(Some(&json!({"goals": 0}))), None);
    }

    #[test]
    fn only_numbers_are_lines() {
        assert_eq!(line_value(Some(&json!(3.5))), Some(3.5));
        assert_eq!(line_value(Some(&json!(3))), Some(3.0));
        assert_eq!(line_value(Some(&json!("3.5"))), None);
        assert_eq!(line_value(Some(&json!(null))), None);
        assert_eq!(line_value(None), None);
    }
}

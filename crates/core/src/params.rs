//! Lenient extraction of typed values from a JSON parameter object.
//!
//! A missing key or a value of the wrong JSON type yields the caller's
//! default. Range checks belong to the caller.

use serde_json::Value;

/// `params[name]` as `f64`; integers are widened.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// `params[name]` as `usize`. Negative or fractional numbers fall back to `default`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// `params[name]` as `u64`.
pub fn param_u64(params: &Value, name: &str, default: u64) -> u64 {
    params.get(name).and_then(Value::as_u64).unwrap_or(default)
}

/// `params[name]` as an owned `String`.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn param_f64_extracts_existing_float() {
        let params = json!({"speed": 2.5});
        assert!((param_f64(&params, "speed", 1.0) - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_widens_integer() {
        let params = json!({"zoom": 100});
        assert!((param_f64(&params, "zoom", 0.0) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_when_missing_or_mistyped() {
        assert!((param_f64(&json!({}), "speed", 3.0) - 3.0).abs() < f64::EPSILON);
        assert!((param_f64(&json!({"speed": "fast"}), "speed", 1.0) - 1.0).abs() < f64::EPSILON);
        assert!((param_f64(&json!({"speed": null}), "speed", 5.0) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_returns_default_for_non_object() {
        let params = json!("not an object");
        assert!((param_f64(&params, "speed", 7.0) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_usize_extracts_existing_integer() {
        assert_eq!(param_usize(&json!({"particles": 42}), "particles", 0), 42);
    }

    #[test]
    fn param_usize_rejects_fraction_and_negative() {
        assert_eq!(param_usize(&json!({"particles": 2.5}), "particles", 99), 99);
        assert_eq!(param_usize(&json!({"particles": -1}), "particles", 5), 5);
    }

    #[test]
    fn param_u64_extracts_large_values() {
        let params = json!({"tick_interval_ms": 50});
        assert_eq!(param_u64(&params, "tick_interval_ms", 0), 50);
        assert_eq!(param_u64(&json!({}), "tick_interval_ms", 16), 16);
    }

    #[test]
    fn param_string_extracts_or_defaults() {
        let params = json!({"color": "#ff0000", "mode": 3});
        assert_eq!(param_string(&params, "color", "#000000"), "#ff0000");
        assert_eq!(param_string(&params, "mode", "epochs"), "epochs");
        assert_eq!(param_string(&params, "missing", "x"), "x");
    }
}

//! Lenient typed lookups into loosely structured JSON configuration.
//!
//! Every helper takes an object, a key and a fallback. Missing keys and
//! values of the wrong JSON type quietly yield the fallback, so a partial
//! scene file or a system's parameter block always produces a usable value.
//! Range checks belong to [`Scene::validate`](crate::scene::Scene::validate).

use serde_json::Value;

use crate::vector::Vector;

/// Reads a number (integer or float) as `f64`.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Reads a non-negative integer. Floats and negatives fall back.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

/// Reads a list of `[x, y]` pairs. Malformed entries are skipped; a missing
/// or non-array value yields an empty list.
pub fn param_points(params: &Value, name: &str) -> Vec<Vector> {
    params
        .get(name)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(as_point).collect())
        .unwrap_or_default()
}

fn as_point(item: &Value) -> Option<Vector> {
    match item.as_array()?.as_slice() {
        [x, y] => Some(Vector::new(x.as_f64()?, y.as_f64()?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn param_f64_reads_float_and_integer() {
        let params = json!({"step_size": 0.4, "speed": 2});
        assert!((param_f64(&params, "step_size", 1.0) - 0.4).abs() < f64::EPSILON);
        assert!((param_f64(&params, "speed", 1.0) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_falls_back_on_missing_or_mistyped() {
        let params = json!({"color_pivot": "high", "vector_cap": null});
        assert!((param_f64(&params, "color_pivot", 8.0) - 8.0).abs() < f64::EPSILON);
        assert!((param_f64(&params, "vector_cap", 10.0) - 10.0).abs() < f64::EPSILON);
        assert!((param_f64(&params, "absent", 3.0) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_f64_on_non_object_uses_default() {
        assert!((param_f64(&json!([1, 2]), "speed", 7.0) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn param_usize_rejects_float_and_negative() {
        let params = json!({"rows": 24, "cols": 2.5, "iterations": -3});
        assert_eq!(param_usize(&params, "rows", 0), 24);
        assert_eq!(param_usize(&params, "cols", 9), 9);
        assert_eq!(param_usize(&params, "iterations", 100), 100);
    }

    #[test]
    fn param_bool_requires_json_bool() {
        let params = json!({"axes": false, "color": 1});
        assert!(!param_bool(&params, "axes", true));
        assert!(param_bool(&params, "color", true));
    }

    #[test]
    fn param_string_reads_or_falls_back() {
        let params = json!({"system": "saddle", "style": 3});
        assert_eq!(param_string(&params, "system", "pendulum"), "saddle");
        assert_eq!(param_string(&params, "style", "cap"), "cap");
    }

    #[test]
    fn param_points_skips_malformed_entries() {
        let params = json!({"seeds": [[1.0, 2.0], [3], "x", [4, 5.5], [1, 2, 3]]});
        let pts = param_points(&params, "seeds");
        assert_eq!(pts, vec![Vector::new(1.0, 2.0), Vector::new(4.0, 5.5)]);
    }

    #[test]
    fn param_points_missing_is_empty() {
        assert!(param_points(&json!({}), "seeds").is_empty());
        assert!(param_points(&json!({"seeds": 4}), "seeds").is_empty());
    }
}

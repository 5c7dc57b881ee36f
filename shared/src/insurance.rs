//! Shipping insurance flag normalisation
//!
//! The backend reports `shipping_insurance` as a boolean, a string or a
//! number depending on the endpoint. Pricing and display decisions only
//! ever see the normalised boolean.

use serde_json::Value;

/// Normalise a heterogeneous insurance flag to a strict boolean.
///
/// - missing / `null` → `false`
/// - booleans are returned as-is
/// - strings are `true` only for `"true"`, `"1"` or `"yes"` (any case)
/// - numbers are `true` only when equal to `1`
/// - anything else (arrays, objects) → `false`
pub fn normalize_insurance_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(s)) => matches!(s.to_lowercase().as_str(), "true" | "1" | "yes"),
        Some(Value::Number(n)) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

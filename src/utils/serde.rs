/*!
 * Serde utilities for request fields that arrive in loosely typed form.
 */

use serde::{Deserialize, Deserializer};

/// Deserialize a non-negative integer given either as a number or as a string.
///
/// Step and limit values often arrive as form fields or query parameters, where
/// everything is a string. Negative numbers, fractions and non-numeric strings
/// are rejected rather than coerced.
///
/// ```rust
/// use serde::Deserialize;
/// use batch_stepper::utils::serde::deserialize_flexible_u64;
///
/// #[derive(Deserialize)]
/// struct Request {
///     #[serde(deserialize_with = "deserialize_flexible_u64")]
///     step: u64,
/// }
///
/// let request: Request = serde_json::from_str(r#"{"step": "3"}"#).unwrap();
/// assert_eq!(request.step, 3);
/// ```
pub fn deserialize_flexible_u64<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| D::Error::custom(format!("Expected a non-negative integer, found {n}"))),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| D::Error::custom(format!("Cannot parse '{s}' as a non-negative integer"))),
        other => Err(D::Error::custom(format!(
            "Expected numeric value, found: {other}"
        ))),
    }
}

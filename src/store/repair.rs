use serde_json::Value;

use super::json_map::JsonMap;
use crate::util::timestamp::Timestamp;

/// Counter values written by older versions were sometimes timestamps or junk.
/// Anything that is not a non-negative integer after conversion becomes 1.
pub fn repair_counts(raw: JsonMap<Value>) -> JsonMap<u64> {
    raw.into_iter()
        .map(|(user_id, value)| {
            let count = coerce_count(&value).unwrap_or_else(|| {
                tracing::warn!("Resetting counter for {} (was {}) to 1", user_id, value);
                1
            });
            (user_id, count)
        })
        .collect()
}

/// Keeps the string entries of a last-use document verbatim; they are only
/// ever shown back to users.
pub fn keep_text_entries(raw: JsonMap<Value>, file: &str) -> JsonMap<String> {
    raw.into_iter()
        .filter_map(|(user_id, value)| match value {
            Value::String(text) => Some((user_id, text)),
            other => {
                tracing::warn!("Dropping {} entry for {} (was {})", file, user_id, other);
                None
            }
        })
        .collect()
}

/// Keeps only entries holding a well-formed timestamp; the rest are dropped
/// one by one so a single bad value does not cost every other user.
pub fn keep_timestamp_entries(raw: JsonMap<Value>, file: &str) -> JsonMap<Timestamp> {
    raw.into_iter()
        .filter_map(|(user_id, value)| {
            let parsed = value.as_str().and_then(|text| Timestamp::parse(text).ok());
            if parsed.is_none() {
                tracing::warn!("Dropping {} entry for {} (was {})", file, user_id, value);
            }
            parsed.map(|stamp| (user_id, stamp))
        })
        .collect()
}

fn coerce_count(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) if s.contains(':') => None,
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64().or_else(|| {
            let truncated = n.as_f64()?.trunc();
            (truncated.is_finite() && truncated >= 0.0).then_some(truncated as u64)
        }),
        Value::Bool(b) => Some(u64::from(*b)),
        _ => None,
    }
}

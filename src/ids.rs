use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id of a stored record. Stored data mixes numeric ids (epoch millis, `max+1`) and
/// string ids (UUIDs, prefixed ids), and comparisons treat both by their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Num(i64),
    Text(String),
}

impl RecordId {
    pub fn matches(&self, other: &str) -> bool {
        match self {
            RecordId::Num(n) => other.trim().parse::<i64>().ok() == Some(*n),
            RecordId::Text(s) => s == other,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RecordId::Num(n) => Some(*n),
            RecordId::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Numeric-looking strings become numbers so ids picked from a form compare
    /// equal to the stored numeric ids.
    pub fn parse(raw: &str) -> Option<Self> {
        let t = raw.trim();
        if t.is_empty() {
            return None;
        }
        Some(match t.parse::<i64>() {
            Ok(n) => RecordId::Num(n),
            Err(_) => RecordId::Text(t.to_string()),
        })
    }

    pub fn from_value(v: &serde_json::Value) -> Option<Self> {
        match v {
            serde_json::Value::Number(n) => n.as_i64().map(RecordId::Num),
            serde_json::Value::String(s) => Self::parse(s),
            _ => None,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Num(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Num(n)
    }
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Epoch-millis id, bumped past the largest existing id so that ids stay unique and
/// increasing even when two records are created within the same millisecond.
pub fn timestamp_id<I: IntoIterator<Item = i64>>(existing: I) -> i64 {
    let now = now_millis();
    match existing.into_iter().max() {
        Some(max) if max >= now => max + 1,
        _ => now,
    }
}

/// `max(existing) + 1`, starting at 1.
pub fn next_local_id<I: IntoIterator<Item = i64>>(existing: I) -> i64 {
    existing.into_iter().fold(0, i64::max) + 1
}

/// `<prefix>_<epochMillis>_<0..1e6>`
pub fn make_id(prefix: &str) -> String {
    let suffix = Uuid::new_v4().as_u128() % 1_000_000;
    format!("{}_{}_{}", prefix, now_millis(), suffix)
}

pub fn new_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Deserializers that accept values the way HTML forms and older records hand them
/// over: numbers, numeric strings, empty strings meaning "unset", and `null` fields.
pub mod lenient {
    use serde::de::{self, Deserializer};
    use serde::Deserialize;
    use serde_json::Value;

    fn value_to_i64(v: Value) -> Option<i64> {
        match v {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    pub fn opt_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        let v = Option::<Value>::deserialize(d)?;
        match v {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(other) => value_to_i64(other.clone())
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("expected a numeric id, got {other}"))),
        }
    }

    pub fn i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        opt_i64(d)?.ok_or_else(|| de::Error::custom("missing numeric id"))
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        let v = Option::<Value>::deserialize(d)?;
        Ok(match v {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(other) => return Err(de::Error::custom(format!("expected a string, got {other}"))),
        })
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let s = string(d)?;
        Ok(if s.trim().is_empty() { None } else { Some(s) })
    }

    /// `null` reads as an empty list.
    pub fn vec<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_id_moves_past_existing_ids() {
        let far_future = now_millis() + 1_000_000;
        assert_eq!(timestamp_id([far_future, 3]), far_future + 1);
        let fresh = timestamp_id(Vec::<i64>::new());
        assert!(fresh > 0);
    }

    #[test]
    fn next_local_id_starts_at_one() {
        assert_eq!(next_local_id(Vec::<i64>::new()), 1);
        assert_eq!(next_local_id([1, 5, 2]), 6);
    }

    #[test]
    fn record_id_matches_by_string_form() {
        assert!(RecordId::Num(42).matches("42"));
        assert!(RecordId::Text("t_1".into()).matches("t_1"));
        assert!(!RecordId::Num(42).matches("042x"));
        assert_eq!(RecordId::parse(" 17 "), Some(RecordId::Num(17)));
        assert_eq!(RecordId::parse(""), None);
    }

    #[test]
    fn make_id_carries_prefix() {
        let id = make_id("sub");
        assert!(id.starts_with("sub_"));
        assert_eq!(id.split('_').count(), 3);
    }
}

//! Dotted-path helpers over `serde_json::Value` trees.
//!
//! UI field names may reach into nested convenience objects
//! (`lifecycle.stage`), so field tables and patches address values by a
//! dotted path rather than a single key.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Navigate a dotted key path in a JSON value tree.
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for part in path.split('.') {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

/// Set a value at a dotted key path, creating intermediate objects as needed.
///
/// A `null` intermediate is replaced by an empty object.
pub fn set_path(root: &mut Value, path: &str, value: Value) -> Result<()> {
    if path.is_empty() {
        return Err(Error::malformed("Empty field path"));
    }

    let (parents, leaf) = match path.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, path),
    };

    let mut current = root;
    if let Some(parents) = parents {
        for part in parents.split('.') {
            let table = current.as_object_mut().ok_or_else(|| {
                Error::malformed(format!("Cannot navigate '{path}' through a non-object value"))
            })?;
            let entry = table
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if entry.is_null() {
                *entry = Value::Object(Map::new());
            }
            current = entry;
        }
    }

    let table = current
        .as_object_mut()
        .ok_or_else(|| Error::malformed(format!("Cannot set '{path}' on a non-object value")))?;
    table.insert(leaf.to_string(), value);
    Ok(())
}

/// Returns `true` when the value counts as "not filled in" for a required
/// form field: absent, `null`, a blank string, or an empty array.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Lenient parse of a calendar day: accepts `YYYY-MM-DD` or a full RFC 3339
/// timestamp (the date part is kept). Blank strings read as `None`.
pub fn parse_day(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_moment(text).map(|at| at.date_naive()))
}

/// Lenient parse of a point in time: accepts RFC 3339 or a bare day
/// (midnight UTC). Blank strings read as `None`.
pub fn parse_moment(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(text)
        .map(|at| at.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|day| day.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

/// `#[serde(with = "...")]` adapter for optional calendar days.
///
/// Date columns come back either as `date` or as `timestamptz` strings
/// depending on how the table was declared; both are accepted.
pub mod day {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    /// Serializes as `YYYY-MM-DD` or `null`.
    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(day) => serializer.collect_str(&day.format("%Y-%m-%d")),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes from `null`, a blank string, a day, or a timestamp.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(text) if text.trim().is_empty() => Ok(None),
            Some(text) => super::parse_day(&text)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid date '{text}'"))),
        }
    }
}

/// `#[serde(with = "...")]` adapter for optional timestamps.
pub mod moment {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    /// Serializes as RFC 3339 or `null`.
    pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(at) => serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes from `null`, a blank string, a timestamp, or a day.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(text) if text.trim().is_empty() => Ok(None),
            Some(text) => super::parse_moment(&text)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid timestamp '{text}'"))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_path_top_level() {
        let val = json!({"name": "Laptop"});
        assert_eq!(get_path(&val, "name"), Some(&json!("Laptop")));
    }

    #[test]
    fn test_get_path_nested() {
        let val = json!({"lifecycle": {"stage": "Active"}});
        assert_eq!(get_path(&val, "lifecycle.stage"), Some(&json!("Active")));
    }

    #[test]
    fn test_get_path_missing() {
        let val = json!({"lifecycle": {"stage": "Active"}});
        assert!(get_path(&val, "lifecycle.deployed").is_none());
        assert!(get_path(&val, "nope").is_none());
    }

    #[test]
    fn test_set_path_creates_objects() {
        let mut val = json!({});
        set_path(&mut val, "lifecycle.stage", json!("Retired")).unwrap();
        assert_eq!(val, json!({"lifecycle": {"stage": "Retired"}}));
    }

    #[test]
    fn test_set_path_replaces_null_parent() {
        let mut val = json!({"lifecycle": null});
        set_path(&mut val, "lifecycle.stage", json!("Active")).unwrap();
        assert_eq!(get_path(&val, "lifecycle.stage"), Some(&json!("Active")));
    }

    #[test]
    fn test_set_path_overwrites() {
        let mut val = json!({"cost": 10});
        set_path(&mut val, "cost", json!(12)).unwrap();
        assert_eq!(val["cost"], 12);
    }

    #[test]
    fn test_set_path_rejects_scalar_parent() {
        let mut val = json!({"name": "x"});
        assert!(set_path(&mut val, "name.first", json!("y")).is_err());
        assert!(set_path(&mut val, "", json!("y")).is_err());
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some(&Value::Null)));
        assert!(is_blank(Some(&json!("  "))));
        assert!(is_blank(Some(&json!([]))));
        assert!(!is_blank(Some(&json!("A-1"))));
        assert!(!is_blank(Some(&json!(0))));
    }

    #[test]
    fn test_parse_day_accepts_date_and_timestamp() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert_eq!(parse_day("2024-06-30"), Some(day));
        assert_eq!(parse_day("2024-06-30T12:15:00+00:00"), Some(day));
        assert_eq!(parse_day("  "), None);
        assert_eq!(parse_day("June"), None);
    }

    #[test]
    fn test_parse_moment_accepts_bare_day() {
        let at = parse_moment("2024-06-30").unwrap();
        assert_eq!(at.to_rfc3339(), "2024-06-30T00:00:00+00:00");
        assert!(parse_moment("2024-06-30T12:15:00.123456+02:00").is_some());
    }

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Dated {
        #[serde(with = "day", default)]
        due: Option<NaiveDate>,
        #[serde(with = "moment", default)]
        seen: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_day_and_moment_adapters() {
        let parsed: Dated =
            serde_json::from_value(json!({"due": "2025-01-02T00:00:00Z", "seen": ""})).unwrap();
        assert_eq!(parsed.due, NaiveDate::from_ymd_opt(2025, 1, 2));
        assert_eq!(parsed.seen, None);

        let out = serde_json::to_value(&parsed).unwrap();
        assert_eq!(out, json!({"due": "2025-01-02", "seen": null}));

        let missing: Dated = serde_json::from_value(json!({})).unwrap();
        assert_eq!(missing, Dated { due: None, seen: None });

        assert!(serde_json::from_value::<Dated>(json!({"due": "soon"})).is_err());
    }
}

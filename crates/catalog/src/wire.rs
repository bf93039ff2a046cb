//! Normalization of backend payloads
//!
//! The backend is loose about shapes: a reference may be a raw identifier or
//! a populated document, a semester may be a number, a numeric string or an
//! extended-JSON `{"$numberInt": "3"}`, and list endpoints may return a bare
//! array or an envelope object. Everything in this module exists so that the
//! rest of the crate only ever sees canonical identifiers and plain numbers.

use chrono::{DateTime, Utc};
use kithab_core::Semester;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Embedded reference data
// ============================================================================

/// Display data that arrived populated alongside a reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Embedded {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,

    /// Number of notes a populated uploader has on record
    #[serde(
        default,
        deserialize_with = "deserialize_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub uploaded_notes: Option<usize>,
}

/// A reference exactly as the backend sends it
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRef {
    /// Bare identifier
    Id(String),
    /// Populated document carrying `_id`
    Populated(PopulatedRef),
}

/// Populated form of a reference
#[derive(Debug, Clone, Deserialize)]
pub struct PopulatedRef {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    #[serde(flatten)]
    pub summary: Embedded,
}

impl RawRef {
    /// Split into the canonical identifier and any embedded display data
    pub fn into_parts<I: From<String>>(self) -> (I, Option<Embedded>) {
        match self {
            RawRef::Id(id) => (I::from(id), None),
            RawRef::Populated(populated) => (I::from(populated.id), Some(populated.summary)),
        }
    }

    /// Just the canonical identifier
    pub fn into_id<I: From<String>>(self) -> I {
        self.into_parts().0
    }
}

// ============================================================================
// Numbers
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Int(u64),
    Float(f64),
    Text(String),
    Extended {
        #[serde(rename = "$numberInt")]
        number_int: String,
    },
}

impl RawNumber {
    fn to_u32(&self) -> Option<u32> {
        match self {
            RawNumber::Int(n) => u32::try_from(*n).ok(),
            RawNumber::Float(f) if *f >= 0.0 && f.fract() == 0.0 && *f <= u32::MAX as f64 => {
                Some(*f as u32)
            }
            RawNumber::Float(_) => None,
            RawNumber::Text(s) | RawNumber::Extended { number_int: s } => s.trim().parse().ok(),
        }
    }
}

/// Deserialize a semester or semester count in any of the backend's shapes.
///
/// Missing or unreadable values become `0`, which is never a valid option,
/// so such records drop out of every cascade instead of failing the list.
pub fn deserialize_semester<'de, D>(deserializer: D) -> Result<Semester, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(|n| n.to_u32()).unwrap_or(0))
}

/// Parse a semester typed by a user
pub fn parse_semester(raw: &str) -> Option<Semester> {
    raw.trim().parse::<Semester>().ok().filter(|s| *s > 0)
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(items.len()),
        Some(Value::Number(n)) => n.as_u64().map(|n| n as usize),
        _ => None,
    })
}

// ============================================================================
// Timestamps
// ============================================================================

/// Deserialize an RFC 3339 timestamp; anything unreadable becomes `None`
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    })
}

// ============================================================================
// Lists
// ============================================================================

/// Decode a list response that is either a bare array or an envelope
/// object holding the array under `key`. A missing key yields an empty list.
pub fn decode_list<T: DeserializeOwned>(value: Value, key: &str) -> serde_json::Result<Vec<T>> {
    match value {
        Value::Array(_) => serde_json::from_value(value),
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(inner) => serde_json::from_value(inner),
        },
        Value::Null => Ok(Vec::new()),
        other => serde_json::from_value(other),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kithab_core::RegulationId;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "deserialize_semester")]
        semester: Semester,
    }

    fn semester_of(value: Value) -> Semester {
        serde_json::from_value::<Holder>(json!({ "semester": value }))
            .unwrap()
            .semester
    }

    #[test]
    fn test_semester_shapes() {
        assert_eq!(semester_of(json!(3)), 3);
        assert_eq!(semester_of(json!("3")), 3);
        assert_eq!(semester_of(json!(" 4 ")), 4);
        assert_eq!(semester_of(json!({ "$numberInt": "5" })), 5);
        assert_eq!(semester_of(json!(6.0)), 6);
        assert_eq!(semester_of(json!(null)), 0);
        assert_eq!(semester_of(json!("abc")), 0);
        assert_eq!(semester_of(json!(-2)), 0);
    }

    #[test]
    fn test_raw_ref_id_and_object_agree() {
        let bare: RawRef = serde_json::from_value(json!("r1")).unwrap();
        let populated: RawRef =
            serde_json::from_value(json!({ "_id": "r1", "name": "R2021" })).unwrap();

        let (bare_id, bare_summary): (RegulationId, _) = bare.into_parts();
        let (pop_id, pop_summary): (RegulationId, _) = populated.into_parts();

        assert_eq!(bare_id, pop_id);
        assert!(bare_summary.is_none());
        assert_eq!(pop_summary.unwrap().name.as_deref(), Some("R2021"));
    }

    #[test]
    fn test_populated_uploader_counts_notes() {
        let raw: RawRef = serde_json::from_value(json!({
            "_id": "f1",
            "name": "Dr. Rao",
            "employeeId": "FAC001",
            "designation": "Professor",
            "uploadedNotes": ["n1", "n2"]
        }))
        .unwrap();
        let (_, summary): (RegulationId, _) = raw.into_parts();
        let summary = summary.unwrap();
        assert_eq!(summary.employee_id.as_deref(), Some("FAC001"));
        assert_eq!(summary.uploaded_notes, Some(2));
    }

    #[test]
    fn test_decode_list_shapes() {
        let bare: Vec<u32> = decode_list(json!([1, 2]), "items").unwrap();
        assert_eq!(bare, vec![1, 2]);

        let wrapped: Vec<u32> = decode_list(json!({ "items": [3], "ok": true }), "items").unwrap();
        assert_eq!(wrapped, vec![3]);

        let missing: Vec<u32> = decode_list(json!({ "ok": true }), "items").unwrap();
        assert!(missing.is_empty());
    }

    #[test]
    fn test_parse_semester() {
        assert_eq!(parse_semester("3"), Some(3));
        assert_eq!(parse_semester("0"), None);
        assert_eq!(parse_semester(""), None);
        assert_eq!(parse_semester("x"), None);
    }

    #[derive(Deserialize)]
    struct Stamp {
        #[serde(default, deserialize_with = "deserialize_timestamp")]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_timestamp_lenient() {
        let ok: Stamp = serde_json::from_value(json!({ "at": "2024-06-01T10:00:00.000Z" })).unwrap();
        assert!(ok.at.is_some());
        let bad: Stamp = serde_json::from_value(json!({ "at": "yesterday" })).unwrap();
        assert!(bad.at.is_none());
        let missing: Stamp = serde_json::from_value(json!({})).unwrap();
        assert!(missing.at.is_none());
    }
}

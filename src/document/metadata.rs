//! The metadata record a document exports.

use serde::Serialize;
use serde_json::{Map, Value};

/// Keys with a dedicated field in [`Metadata`].
const KNOWN_KEYS: [&str; 5] = ["title", "description", "date", "dateCreated", "dateModified"];

/// Document metadata as exported to the site.
///
/// Known keys get typed fields; everything else an author writes is carried
/// through untouched in `extra`. A `None` field is "absent" and may be filled
/// by inference; a `Some` field is never replaced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Primary date, `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,

    /// Author-defined keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Metadata {
    /// Build a record from a parsed key-value block.
    ///
    /// `null` yields an empty record; any other non-object value is rejected.
    /// Scalar values of known keys are stringified (`date: 2024` → `"2024"`),
    /// `null` values count as absent.
    pub fn from_value(value: Value) -> Option<Self> {
        let mut map = match value {
            Value::Object(map) => map,
            Value::Null => return Some(Self::default()),
            _ => return None,
        };

        let mut take = |key: &str| map.remove(key).and_then(scalar_to_string);
        let title = take(KNOWN_KEYS[0]);
        let description = take(KNOWN_KEYS[1]);
        let date = take(KNOWN_KEYS[2]);
        let date_created = take(KNOWN_KEYS[3]);
        let date_modified = take(KNOWN_KEYS[4]);

        Some(Self {
            title,
            description,
            date,
            date_created,
            date_modified,
            extra: map,
        })
    }

    /// True when no key at all is present.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.date_created.is_none()
            && self.date_modified.is_none()
            && self.extra.is_empty()
    }

    /// Render as a compact JSON object literal, the form used in module text.
    pub fn to_literal(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_owned())
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

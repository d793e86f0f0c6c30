//! Note record and write-input shapes.
//!
//! # Responsibility
//! - Define the canonical JSON shape shared by the remote API and the local
//!   blob (`id`, `title`, `content`, `createdAt`, `updatedAt`).
//! - Define create/update inputs whose absent fields are omitted on the wire.
//!
//! # Invariants
//! - `id` never changes after creation.
//! - `updated_at` is stamped by the gateway, never by callers.

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque note identifier.
///
/// Local notes use UUIDv4 strings; remote notes use whatever the server issues.
pub type NoteId = String;

/// Title applied when a note is created without one.
pub const DEFAULT_NOTE_TITLE: &str = "Untitled";

/// Canonical persisted note.
///
/// Missing or `null` fields in stored data are tolerated: text defaults to
/// empty and timestamps to `0`. Fractional timestamps are truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Unix epoch milliseconds.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: i64,
    /// Unix epoch milliseconds.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: i64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Integer(i64),
    Float(f64),
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawTimestamp>::deserialize(deserializer)? {
        Some(RawTimestamp::Integer(value)) => value,
        // `as` saturates at the i64 bounds and maps NaN to 0.
        Some(RawTimestamp::Float(value)) => value as i64,
        None => 0,
    })
}

impl Note {
    /// Returns whether `needle` occurs in the title or content, ignoring case.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }
}

/// Input for creating a note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl NewNote {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
        }
    }

    /// The blank note created by the "add new" action.
    pub fn untitled() -> Self {
        Self::new(DEFAULT_NOTE_TITLE, "")
    }

    /// Title to persist: empty or missing titles fall back to `Untitled`.
    pub fn resolved_title(&self) -> String {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => DEFAULT_NOTE_TITLE.to_string(),
        }
    }

    pub fn resolved_content(&self) -> String {
        self.content.clone().unwrap_or_default()
    }
}

/// Partial update for an existing note. Absent fields are preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl NoteUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: None,
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            title: None,
            content: Some(content.into()),
        }
    }

    /// Merges this update onto `note` and stamps `updated_at`.
    ///
    /// The stamp never moves backwards, so a clock that lags the stored value
    /// still yields a non-decreasing `updated_at`.
    pub fn apply_to(&self, note: &mut Note, now_ms: i64) {
        if let Some(title) = &self.title {
            note.title = title.clone();
        }
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
        note.updated_at = now_ms.max(note.updated_at);
    }
}

#[cfg(test)]
mod tests {
    use super::{NewNote, Note, NoteUpdate};

    fn sample() -> Note {
        Note {
            id: "n1".to_string(),
            title: "Groceries".to_string(),
            content: "milk, eggs".to_string(),
            created_at: 100,
            updated_at: 200,
        }
    }

    #[test]
    fn note_uses_camel_case_timestamps() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["createdAt"], 100);
        assert_eq!(json["updatedAt"], 200);
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn note_tolerates_missing_fields() {
        let note: Note = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert_eq!(note.title, "");
        assert_eq!(note.content, "");
        assert_eq!(note.updated_at, 0);
    }

    #[test]
    fn note_tolerates_null_fields_and_float_timestamps() {
        let note: Note = serde_json::from_str(
            r#"{"id":"x","title":null,"content":null,"createdAt":1.7e12,"updatedAt":null}"#,
        )
        .unwrap();
        assert_eq!(note.title, "");
        assert_eq!(note.content, "");
        assert_eq!(note.created_at, 1_700_000_000_000);
        assert_eq!(note.updated_at, 0);
    }

    #[test]
    fn note_still_rejects_wrong_types() {
        assert!(serde_json::from_str::<Note>(r#"{"id":"x","title":7}"#).is_err());
        assert!(serde_json::from_str::<Note>(r#"{"id":"x","updatedAt":"soon"}"#).is_err());
    }

    #[test]
    fn new_note_defaults_empty_title_to_untitled() {
        assert_eq!(NewNote::default().resolved_title(), "Untitled");
        assert_eq!(NewNote::new("", "x").resolved_title(), "Untitled");
        assert_eq!(NewNote::new("Todo", "x").resolved_title(), "Todo");
        assert_eq!(NewNote::default().resolved_content(), "");
    }

    #[test]
    fn update_omits_absent_fields_on_the_wire() {
        let json = serde_json::to_string(&NoteUpdate::title("Renamed")).unwrap();
        assert_eq!(json, r#"{"title":"Renamed"}"#);
    }

    #[test]
    fn apply_to_preserves_absent_fields_and_never_rewinds() {
        let mut note = sample();
        NoteUpdate::content("bread").apply_to(&mut note, 150);
        assert_eq!(note.title, "Groceries");
        assert_eq!(note.content, "bread");
        assert_eq!(note.created_at, 100);
        assert_eq!(note.updated_at, 200);

        NoteUpdate::title("Shopping").apply_to(&mut note, 300);
        assert_eq!(note.updated_at, 300);
    }

    #[test]
    fn matches_lowercase_checks_title_and_content() {
        let note = sample();
        assert!(note.matches_lowercase("grocer"));
        assert!(note.matches_lowercase("eggs"));
        assert!(!note.matches_lowercase("report"));
    }
}

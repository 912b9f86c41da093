//! Note model representing a note attached to a CRM record.

use crate::models::record::{RecordAuthor, RecordReference};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static HTML_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("Failed to compile HTML tag regex"));

/// A note record in the CRM.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Note {
    /// Unique identifier for the note
    pub id: String,

    /// Short title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The note content (may contain HTML)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Authoring workspace member, if recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<RecordAuthor>,

    /// Records this note is linked to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_records: Vec<RecordReference>,

    /// When the note was created (ISO 8601 timestamp)
    pub created_at: String,
}

impl Note {
    /// Create a new note with required fields.
    pub fn new(id: String, created_at: String) -> Self {
        Self {
            id,
            created_at,
            ..Default::default()
        }
    }

    /// Strip HTML tags from the body to get plain text.
    pub fn plain_text(&self) -> String {
        match &self.body {
            Some(body) => HTML_TAG_REGEX.replace_all(body, "").to_string(),
            None => String::new(),
        }
    }
}

/// Changes object for a partial note update.
#[derive(Debug, Clone, Serialize, Default)]
pub struct NoteChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Request payload for updating a note.
/// This matches the API structure: { "changes": { ... } }
#[derive(Debug, Clone, Serialize)]
pub struct UpdateNoteRequest {
    pub changes: NoteChanges,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::EntityType;

    #[test]
    fn test_note_deserialization() {
        let json = r#"{
            "id": "note_1",
            "title": "Kickoff call",
            "body": "<p>Spoke with the team</p>",
            "author": {"id": "member_1", "first_name": "Ada"},
            "linked_records": [{"target_type": "person", "target_id": "person_1"}],
            "created_at": "2024-01-20T14:00:00Z"
        }"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.title.as_deref(), Some("Kickoff call"));
        assert_eq!(note.created_at, "2024-01-20T14:00:00Z");
        assert!(note.linked_records[0].points_at(EntityType::Person, "person_1"));
    }

    #[test]
    fn test_note_plain_text() {
        let mut note = Note::new("note_1".to_string(), "2024-01-20T14:00:00Z".to_string());
        note.body = Some("<p>This is <strong>bold</strong> text</p>".to_string());

        let plain = note.plain_text();
        assert!(!plain.contains("<p>"));
        assert!(!plain.contains("<strong>"));
        assert!(plain.contains("This is"));
        assert!(plain.contains("bold"));
    }

    #[test]
    fn test_note_plain_text_empty_body() {
        let note = Note::new("note_2".to_string(), "2024-01-21T00:00:00Z".to_string());
        assert_eq!(note.plain_text(), "");
    }
}

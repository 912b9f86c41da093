//! Comment model representing a threaded comment on a CRM record.

use crate::models::record::{RecordAuthor, RecordReference};
use serde::{Deserialize, Serialize};

/// A comment record in the CRM.
///
/// Comments only exist attached to another record; `entry` names it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Comment {
    /// Unique identifier for the comment
    pub id: String,

    /// The comment text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Authoring workspace member, if recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<RecordAuthor>,

    /// The record this comment is attached to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<RecordReference>,

    /// When the comment was created (ISO 8601 timestamp)
    pub created_at: String,
}

impl Comment {
    /// Create a new comment with required fields.
    pub fn new(id: String, created_at: String) -> Self {
        Self {
            id,
            created_at,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::EntityType;

    #[test]
    fn test_comment_deserialization() {
        let json = r#"{
            "id": "comment_1",
            "body": "Agreed, moving forward",
            "author": {"id": "member_1", "first_name": "Ada", "last_name": "Lovelace"},
            "entry": {"target_type": "opportunity", "target_id": "opp_1"},
            "created_at": "2024-02-15T08:00:00Z"
        }"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.body.as_deref(), Some("Agreed, moving forward"));
        assert!(comment
            .entry
            .as_ref()
            .unwrap()
            .points_at(EntityType::Opportunity, "opp_1"));
    }

    #[test]
    fn test_comment_absent_optionals() {
        let json = r#"{"id": "comment_2", "created_at": "2024-02-16T00:00:00Z"}"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert!(comment.body.is_none());
        assert!(comment.author.is_none());
        assert!(comment.entry.is_none());
    }
}

//! Task model representing a to-do item in the CRM.

use crate::models::record::{
    deserialize_target_id, serialize_target_id, target_object, RecordAuthor, RecordReference,
};
use serde::{Deserialize, Serialize};

/// A task record in the CRM.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Task {
    /// Unique identifier for the task
    pub id: String,

    /// Short title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Longer body text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Workflow status (e.g., "open", "completed")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// ID of the assigned workspace member (API field: assignee, a
    /// {target_id} wrapper)
    #[serde(
        default,
        rename = "assignee",
        deserialize_with = "deserialize_target_id",
        serialize_with = "serialize_target_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub assignee_id: Option<String>,

    /// Authoring workspace member, if recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<RecordAuthor>,

    /// Records this task is linked to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_records: Vec<RecordReference>,

    /// When the task is due (ISO 8601 timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<String>,

    /// When the task was created (ISO 8601 timestamp)
    pub created_at: String,
}

impl Task {
    /// Create a new task with required fields.
    pub fn new(id: String, created_at: String) -> Self {
        Self {
            id,
            created_at,
            ..Default::default()
        }
    }

    /// Whether the task is assigned to anyone.
    pub fn is_assigned(&self) -> bool {
        self.assignee_id.is_some()
    }
}

/// Changes object for a partial task update.
#[derive(Debug, Clone, Serialize, Default)]
pub struct TaskChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// New assignee reference, serialized as a {target_id} wrapper
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<String>,
}

impl TaskChanges {
    /// Changes that assign the task to a workspace member.
    pub fn assignee_reference(member_id: &str) -> Self {
        Self {
            assignee: Some(target_object(member_id)),
            ..Default::default()
        }
    }
}

/// Request payload for updating a task.
/// This matches the API structure: { "changes": { ... } }
#[derive(Debug, Clone, Serialize)]
pub struct UpdateTaskRequest {
    pub changes: TaskChanges,
}

//! Shared record vocabulary: entity type tags, relation pointers, and authors.

use crate::error::CrmApiError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type tag for a CRM record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Person,
    Company,
    Opportunity,
    Task,
    Note,
}

impl EntityType {
    /// The lowercase token used on the wire and in tool arguments.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Person => "person",
            EntityType::Company => "company",
            EntityType::Opportunity => "opportunity",
            EntityType::Task => "task",
            EntityType::Note => "note",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = CrmApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "person" => Ok(EntityType::Person),
            "company" => Ok(EntityType::Company),
            "opportunity" => Ok(EntityType::Opportunity),
            "task" => Ok(EntityType::Task),
            "note" => Ok(EntityType::Note),
            other => Err(CrmApiError::Validation(format!(
                "unknown entity type: {}",
                other
            ))),
        }
    }
}

/// A relation pointer from one record to another.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordReference {
    /// Type of the referenced record
    pub target_type: EntityType,

    /// ID of the referenced record
    pub target_id: String,
}

impl RecordReference {
    pub fn new(target_type: EntityType, target_id: impl Into<String>) -> Self {
        Self {
            target_type,
            target_id: target_id.into(),
        }
    }

    /// Whether this reference points at the given record.
    pub fn points_at(&self, target_type: EntityType, target_id: &str) -> bool {
        self.target_type == target_type && self.target_id == target_id
    }
}

/// Author reference carried by tasks, notes, and comments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RecordAuthor {
    /// ID of the authoring workspace member
    pub id: String,

    /// First name, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// Last name, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl RecordAuthor {
    /// Resolve a display name from first/last name, if either is present.
    pub fn display_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }
}

/// Single-field wrapper the API uses for record references.
#[derive(Debug, Deserialize)]
pub(crate) struct TargetEntry {
    pub(crate) target_id: String,
}

/// Unwrap an optional `{"target_id": "..."}` object into a plain ID.
pub(crate) fn deserialize_target_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entry: Option<TargetEntry> = Option::deserialize(deserializer)?;
    Ok(entry.map(|e| e.target_id))
}

/// Borrowed counterpart of [`TargetEntry`] for serialization.
#[derive(Serialize)]
struct TargetEntryRef<'a> {
    target_id: &'a str,
}

/// Wrap a plain ID back into the `{"target_id": "..."}` object.
pub(crate) fn serialize_target_id<S>(
    id: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match id {
        Some(id) => TargetEntryRef { target_id: id }.serialize(serializer),
        None => serializer.serialize_none(),
    }
}

/// Serialize a plain ID back into the `{"target_id": "..."}` wrapper.
pub(crate) fn target_object(id: &str) -> serde_json::Value {
    serde_json::json!({ "target_id": id })
}

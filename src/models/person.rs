//! Person model representing a contact in the CRM.

use crate::models::record::{deserialize_target_id, serialize_target_id, target_object};
use serde::{Deserialize, Deserializer, Serialize};

/// Structured name object carried by person records.
///
/// Preserved as-is rather than flattened so callers can distinguish "no first
/// name" from "no name at all".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct PersonName {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl PersonName {
    /// Resolve a single display string, if any part is present.
    pub fn full(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }
}

/// Email address entry for a person (from API).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct EmailEntry {
    /// The email address
    pub email_address: String,
}

/// Phone number entry for a person (from API).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct PhoneEntry {
    /// The phone number
    pub phone_number: String,
}

/// Custom deserializer that unwraps email entries to plain strings.
fn deserialize_emails<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Vec<EmailEntry> = Vec::deserialize(deserializer)?;
    Ok(entries.into_iter().map(|e| e.email_address).collect())
}

/// Custom deserializer that unwraps phone entries to plain strings.
fn deserialize_phones<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Vec<PhoneEntry> = Vec::deserialize(deserializer)?;
    Ok(entries.into_iter().map(|e| e.phone_number).collect())
}

/// A person record in the CRM.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Person {
    /// Unique identifier for the person
    pub id: String,

    /// Structured name, absent if the record was created without one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<PersonName>,

    /// Email addresses (from API as array of {email_address} objects)
    #[serde(
        default,
        rename = "email_addresses",
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_emails"
    )]
    pub emails: Vec<String>,

    /// Phone numbers (from API as array of {phone_number} objects)
    #[serde(
        default,
        rename = "phone_numbers",
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_phones"
    )]
    pub phones: Vec<String>,

    /// Job title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,

    /// ID of the company this person belongs to (API field: company, a
    /// {target_id} wrapper)
    #[serde(
        default,
        rename = "company",
        deserialize_with = "deserialize_target_id",
        serialize_with = "serialize_target_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub company_id: Option<String>,

    /// When the record was created (ISO 8601 timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Person {
    /// Create a new person with minimal required fields.
    pub fn new(id: String) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Display name for summaries: full name, first email, or the ID.
    pub fn display_name(&self) -> String {
        if let Some(full) = self.name.as_ref().and_then(PersonName::full) {
            return full;
        }
        if let Some(email) = self.emails.first() {
            return email.clone();
        }
        self.id.clone()
    }

    /// Primary email address, if any.
    pub fn primary_email(&self) -> Option<&str> {
        self.emails.first().map(String::as_str)
    }
}

/// Changes object for a partial person update.
#[derive(Debug, Clone, Serialize, Default)]
pub struct PersonChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<PersonName>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,

    /// New company reference, serialized as a {target_id} wrapper
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<serde_json::Value>,
}

impl PersonChanges {
    /// Changes that reassign the person to a different company.
    pub fn company_reference(company_id: &str) -> Self {
        Self {
            company: Some(target_object(company_id)),
            ..Default::default()
        }
    }
}

/// Request payload for updating a person.
/// This matches the API structure: { "changes": { ... } }
#[derive(Debug, Clone, Serialize)]
pub struct UpdatePersonRequest {
    pub changes: PersonChanges,
}

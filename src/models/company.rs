//! Company model representing an organization in the CRM.

use serde::{Deserialize, Deserializer, Serialize};

/// Domain entry for a company (from API).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct DomainEntry {
    /// The domain name
    pub domain: String,
}

/// Single-field wrapper the API uses for website links.
#[derive(Debug, Deserialize)]
struct LinkEntry {
    url: String,
}

/// Custom deserializer that unwraps domain entries to plain strings.
fn deserialize_domains<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Vec<DomainEntry> = Vec::deserialize(deserializer)?;
    Ok(entries.into_iter().map(|e| e.domain).collect())
}

/// Custom deserializer that unwraps an optional {url} link object.
fn deserialize_link<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entry: Option<LinkEntry> = Option::deserialize(deserializer)?;
    Ok(entry.map(|e| e.url))
}

/// A company record in the CRM.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Company {
    /// Unique identifier for the company
    pub id: String,

    /// Company name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Domains (from API as array of {domain} objects)
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_domains"
    )]
    pub domains: Vec<String>,

    /// Website URL (API field: website, a {url} wrapper)
    #[serde(
        default,
        deserialize_with = "deserialize_link",
        skip_serializing_if = "Option::is_none"
    )]
    pub website: Option<String>,

    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// When the record was created (ISO 8601 timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Company {
    /// Create a new company with minimal required fields.
    pub fn new(id: String) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Display name for summaries: name, first domain, or the ID.
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            if !name.is_empty() {
                return name.clone();
            }
        }
        if let Some(domain) = self.domains.first() {
            return domain.clone();
        }
        self.id.clone()
    }
}

/// Changes object for a partial company update.
#[derive(Debug, Clone, Serialize, Default)]
pub struct CompanyChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request payload for updating a company.
/// This matches the API structure: { "changes": { ... } }
#[derive(Debug, Clone, Serialize)]
pub struct UpdateCompanyRequest {
    pub changes: CompanyChanges,
}

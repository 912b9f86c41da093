//! Opportunity model representing a deal in the CRM pipeline.

use crate::models::money::Money;
use crate::models::record::{deserialize_target_id, serialize_target_id, target_object};
use serde::{Deserialize, Serialize};

/// An opportunity record in the CRM.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Opportunity {
    /// Unique identifier for the opportunity
    pub id: String,

    /// Deal name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Sales stage (e.g., "NEW", "NEGOTIATION"); absent for unstaged deals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,

    /// Deal value in micro-units, preserved structured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Money>,

    /// ID of the associated company (API field: company, a {target_id} wrapper)
    #[serde(
        default,
        rename = "company",
        deserialize_with = "deserialize_target_id",
        serialize_with = "serialize_target_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub company_id: Option<String>,

    /// ID of the designated point of contact (API field: point_of_contact)
    #[serde(
        default,
        rename = "point_of_contact",
        deserialize_with = "deserialize_target_id",
        serialize_with = "serialize_target_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub point_of_contact_id: Option<String>,

    /// When the record was created (ISO 8601 timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Opportunity {
    /// Create a new opportunity with minimal required fields.
    pub fn new(id: String) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Display name for summaries: deal name or the ID.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => self.id.clone(),
        }
    }

    /// Deal value in micro-units, zero when unset.
    pub fn amount_micros(&self) -> i64 {
        self.value.as_ref().map(|v| v.amount_micros).unwrap_or(0)
    }
}

/// Changes object for a partial opportunity update.
///
/// Only the fields a caller supplied are serialized, so an update touches
/// nothing else on the record.
#[derive(Debug, Clone, Serialize, Default)]
pub struct OpportunityChanges {
    /// New company reference, serialized as a {target_id} wrapper
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<serde_json::Value>,

    /// New point-of-contact reference, serialized as a {target_id} wrapper
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_of_contact: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

impl OpportunityChanges {
    /// Changes that relink the opportunity to a company and/or contact.
    pub fn relink(company_id: Option<&str>, point_of_contact_id: Option<&str>) -> Self {
        Self {
            company: company_id.map(target_object),
            point_of_contact: point_of_contact_id.map(target_object),
            stage: None,
        }
    }

    /// True when no field would be written.
    pub fn is_empty(&self) -> bool {
        self.company.is_none() && self.point_of_contact.is_none() && self.stage.is_none()
    }
}

/// Request payload for updating an opportunity.
/// This matches the API structure: { "changes": { ... } }
#[derive(Debug, Clone, Serialize)]
pub struct UpdateOpportunityRequest {
    pub changes: OpportunityChanges,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opportunity_deserialization() {
        let json = r#"{
            "id": "opp_1",
            "name": "Deal A",
            "stage": "NEW",
            "value": {"amount_micros": 50000000, "currency_code": "USD"},
            "company": {"target_id": "comp_1"},
            "point_of_contact": {"target_id": "person_1"},
            "created_at": "2024-02-01T12:00:00Z"
        }"#;
        let opp: Opportunity = serde_json::from_str(json).unwrap();
        assert_eq!(opp.display_name(), "Deal A");
        assert_eq!(opp.stage.as_deref(), Some("NEW"));
        assert_eq!(opp.amount_micros(), 50_000_000);
        assert_eq!(opp.company_id.as_deref(), Some("comp_1"));
        assert_eq!(opp.point_of_contact_id.as_deref(), Some("person_1"));
    }

    #[test]
    fn test_opportunity_absent_optionals() {
        let json = r#"{"id": "opp_2"}"#;
        let opp: Opportunity = serde_json::from_str(json).unwrap();
        assert!(opp.stage.is_none());
        assert!(opp.value.is_none());
        assert_eq!(opp.amount_micros(), 0);
        assert!(opp.company_id.is_none());
        assert!(opp.point_of_contact_id.is_none());
    }

    #[test]
    fn test_relink_serializes_only_supplied_fields() {
        let request = UpdateOpportunityRequest {
            changes: OpportunityChanges::relink(Some("comp_1"), None),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["changes"]["company"]["target_id"], "comp_1");
        assert!(value["changes"].get("point_of_contact").is_none());
        assert!(value["changes"].get("stage").is_none());
    }

    #[test]
    fn test_relink_empty_detection() {
        assert!(OpportunityChanges::relink(None, None).is_empty());
        assert!(!OpportunityChanges::relink(None, Some("person_1")).is_empty());
    }
}

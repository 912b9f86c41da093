//! Relationship service layer.
//!
//! Business logic for per-entity relation views and link/transfer mutations.

use crate::error::{CrmApiError, CrmApiResult};
use crate::models::EntityType;
use crate::tools::{
    CompanyContacts, LinkedOpportunity, PersonOpportunities, RelationshipSummary,
    RelationshipTools, TransferredContact,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Relationship service trait for business operations.
#[async_trait]
pub trait RelationshipService: Send + Sync {
    /// Get every contact at a company.
    async fn get_company_contacts(&self, company_id: &str) -> CrmApiResult<CompanyContacts>;

    /// Get every opportunity where a person is the point of contact.
    async fn get_person_opportunities(&self, person_id: &str)
        -> CrmApiResult<PersonOpportunities>;

    /// Link an opportunity to a company and/or point of contact.
    async fn link_opportunity_to_company(
        &self,
        opportunity_id: &str,
        company_id: Option<String>,
        point_of_contact_id: Option<String>,
    ) -> CrmApiResult<LinkedOpportunity>;

    /// Reassign a contact to a different company.
    async fn transfer_contact_to_company(
        &self,
        contact_id: &str,
        to_company_id: &str,
        from_company_id: Option<String>,
    ) -> CrmApiResult<TransferredContact>;

    /// Compute per-relation-kind counts for an entity.
    async fn get_relationship_summary(
        &self,
        entity_id: &str,
        entity_type: &str,
    ) -> CrmApiResult<RelationshipSummary>;
}

/// Default implementation of RelationshipService.
pub struct RelationshipServiceImpl {
    relationship_tools: Arc<RelationshipTools>,
}

/// Validation helper functions.
impl RelationshipServiceImpl {
    /// Validate record ID format.
    fn validate_record_id(record_id: &str, label: &str) -> Result<(), String> {
        if record_id.trim().is_empty() {
            return Err(format!("{} cannot be empty", label));
        }
        if record_id.len() > 100 {
            return Err(format!("{} too long", label));
        }
        Ok(())
    }
}

impl RelationshipServiceImpl {
    /// Create a new relationship service.
    pub fn new(relationship_tools: Arc<RelationshipTools>) -> Self {
        Self { relationship_tools }
    }
}

#[async_trait]
impl RelationshipService for RelationshipServiceImpl {
    async fn get_company_contacts(&self, company_id: &str) -> CrmApiResult<CompanyContacts> {
        Self::validate_record_id(company_id, "Company ID").map_err(CrmApiError::Validation)?;
        self.relationship_tools.get_company_contacts(company_id).await
    }

    async fn get_person_opportunities(
        &self,
        person_id: &str,
    ) -> CrmApiResult<PersonOpportunities> {
        Self::validate_record_id(person_id, "Person ID").map_err(CrmApiError::Validation)?;
        self.relationship_tools
            .get_person_opportunities(person_id)
            .await
    }

    async fn link_opportunity_to_company(
        &self,
        opportunity_id: &str,
        company_id: Option<String>,
        point_of_contact_id: Option<String>,
    ) -> CrmApiResult<LinkedOpportunity> {
        Self::validate_record_id(opportunity_id, "Opportunity ID")
            .map_err(CrmApiError::Validation)?;
        self.relationship_tools
            .link_opportunity_to_company(
                opportunity_id,
                company_id.as_deref(),
                point_of_contact_id.as_deref(),
            )
            .await
    }

    async fn transfer_contact_to_company(
        &self,
        contact_id: &str,
        to_company_id: &str,
        from_company_id: Option<String>,
    ) -> CrmApiResult<TransferredContact> {
        Self::validate_record_id(contact_id, "Contact ID").map_err(CrmApiError::Validation)?;
        Self::validate_record_id(to_company_id, "Company ID").map_err(CrmApiError::Validation)?;
        self.relationship_tools
            .transfer_contact_to_company(contact_id, to_company_id, from_company_id.as_deref())
            .await
    }

    async fn get_relationship_summary(
        &self,
        entity_id: &str,
        entity_type: &str,
    ) -> CrmApiResult<RelationshipSummary> {
        Self::validate_record_id(entity_id, "Entity ID").map_err(CrmApiError::Validation)?;
        let entity_type: EntityType = entity_type.parse()?;
        self.relationship_tools
            .get_relationship_summary(entity_id, entity_type)
            .await
    }
}

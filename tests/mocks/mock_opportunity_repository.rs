use async_trait::async_trait;
use crm_mcp_server::error::{CrmApiError, CrmApiResult};
use crm_mcp_server::models::{Opportunity, OpportunityChanges};
use crm_mcp_server::repositories::{OpportunityFilter, OpportunityRepository, Page};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock opportunity repository for testing.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockOpportunityRepository {
    opportunities: Arc<Mutex<HashMap<String, Opportunity>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
}

#[allow(dead_code)]
impl MockOpportunityRepository {
    /// Create a new empty MockOpportunityRepository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an opportunity to the mock repository.
    pub fn add_opportunity(&self, opportunity: Opportunity) {
        let mut opportunities = self.opportunities.lock().unwrap();
        opportunities.insert(opportunity.id.clone(), opportunity);
    }

    /// Add multiple opportunities to the mock repository.
    pub fn add_opportunities(&self, opportunities_list: Vec<Opportunity>) {
        let mut opportunities = self.opportunities.lock().unwrap();
        for opportunity in opportunities_list {
            opportunities.insert(opportunity.id.clone(), opportunity);
        }
    }

    /// Get a snapshot of a stored opportunity.
    pub fn get_stored(&self, id: &str) -> Option<Opportunity> {
        self.opportunities.lock().unwrap().get(id).cloned()
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    fn track_call(&self, method: &str) {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;
    }

    fn matches(opportunity: &Opportunity, filter: &OpportunityFilter) -> bool {
        if let Some(company_id) = &filter.company_id {
            if opportunity.company_id.as_deref() != Some(company_id.as_str()) {
                return false;
            }
        }
        if let Some(poc_id) = &filter.point_of_contact_id {
            if opportunity.point_of_contact_id.as_deref() != Some(poc_id.as_str()) {
                return false;
            }
        }
        if let Some(stage) = &filter.stage {
            if opportunity.stage.as_deref() != Some(stage.as_str()) {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl OpportunityRepository for MockOpportunityRepository {
    async fn get(&self, id: &str) -> CrmApiResult<Opportunity> {
        self.track_call("get");

        let opportunities = self.opportunities.lock().unwrap();
        opportunities
            .get(id)
            .cloned()
            .ok_or_else(|| CrmApiError::NotFound(format!("Opportunity {} not found", id)))
    }

    async fn search(
        &self,
        filter: &OpportunityFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Opportunity>> {
        self.track_call("search");

        let opportunities = self.opportunities.lock().unwrap();
        let mut matched: Vec<Opportunity> = opportunities
            .values()
            .filter(|opportunity| Self::matches(opportunity, filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.id.cmp(&b.id));

        let total_count = matched.len();
        let items: Vec<Opportunity> = matched.into_iter().skip(offset).take(limit).collect();
        Ok(Page::new(items, total_count))
    }

    async fn create(&self, opportunity: &Opportunity) -> CrmApiResult<Opportunity> {
        self.track_call("create");

        let mut opportunities = self.opportunities.lock().unwrap();
        if opportunities.contains_key(&opportunity.id) {
            return Err(CrmApiError::Validation(format!(
                "Opportunity with ID {} already exists",
                opportunity.id
            )));
        }
        opportunities.insert(opportunity.id.clone(), opportunity.clone());
        Ok(opportunity.clone())
    }

    async fn update(&self, id: &str, changes: &OpportunityChanges) -> CrmApiResult<Opportunity> {
        self.track_call("update");

        let mut opportunities = self.opportunities.lock().unwrap();
        let opportunity = opportunities
            .get_mut(id)
            .ok_or_else(|| CrmApiError::NotFound(format!("Opportunity {} not found", id)))?;

        if let Some(company) = &changes.company {
            opportunity.company_id = company["target_id"].as_str().map(String::from);
        }
        if let Some(point_of_contact) = &changes.point_of_contact {
            opportunity.point_of_contact_id =
                point_of_contact["target_id"].as_str().map(String::from);
        }
        if let Some(stage) = &changes.stage {
            opportunity.stage = Some(stage.clone());
        }

        Ok(opportunity.clone())
    }
}

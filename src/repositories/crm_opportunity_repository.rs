use crate::client::AsyncCrmClient;
use crate::error::CrmApiResult;
use crate::models::{Opportunity, OpportunityChanges};
use crate::repositories::traits::{OpportunityFilter, OpportunityRepository, Page};
use async_trait::async_trait;
use std::sync::Arc;

/// Opportunity repository implementation backed by the CRM API client.
pub struct CrmOpportunityRepository {
    client: Arc<dyn AsyncCrmClient>,
}

impl CrmOpportunityRepository {
    /// Create a new CrmOpportunityRepository with the given client.
    pub fn new(client: Arc<dyn AsyncCrmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OpportunityRepository for CrmOpportunityRepository {
    async fn get(&self, id: &str) -> CrmApiResult<Opportunity> {
        self.client.get_opportunity(id).await
    }

    async fn search(
        &self,
        filter: &OpportunityFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Opportunity>> {
        self.client
            .search_opportunities(filter.clone(), limit, offset)
            .await
    }

    async fn create(&self, opportunity: &Opportunity) -> CrmApiResult<Opportunity> {
        self.client.create_opportunity(opportunity).await
    }

    async fn update(&self, id: &str, changes: &OpportunityChanges) -> CrmApiResult<Opportunity> {
        self.client.update_opportunity(id, changes).await
    }
}

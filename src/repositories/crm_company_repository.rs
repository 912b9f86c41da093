use crate::client::AsyncCrmClient;
use crate::error::CrmApiResult;
use crate::models::{Company, CompanyChanges};
use crate::repositories::traits::{CompanyFilter, CompanyRepository, Page};
use async_trait::async_trait;
use std::sync::Arc;

/// Company repository implementation backed by the CRM API client.
pub struct CrmCompanyRepository {
    client: Arc<dyn AsyncCrmClient>,
}

impl CrmCompanyRepository {
    /// Create a new CrmCompanyRepository with the given client.
    pub fn new(client: Arc<dyn AsyncCrmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CompanyRepository for CrmCompanyRepository {
    async fn get(&self, id: &str) -> CrmApiResult<Company> {
        self.client.get_company(id).await
    }

    async fn search(
        &self,
        filter: &CompanyFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Company>> {
        self.client
            .search_companies(filter.clone(), limit, offset)
            .await
    }

    async fn create(&self, company: &Company) -> CrmApiResult<Company> {
        self.client.create_company(company).await
    }

    async fn update(&self, id: &str, changes: &CompanyChanges) -> CrmApiResult<Company> {
        self.client.update_company(id, changes).await
    }
}

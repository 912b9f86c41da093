use async_trait::async_trait;
use crm_mcp_server::error::{CrmApiError, CrmApiResult};
use crm_mcp_server::models::{Company, CompanyChanges};
use crm_mcp_server::repositories::{CompanyFilter, CompanyRepository, Page};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock company repository for testing.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockCompanyRepository {
    companies: Arc<Mutex<HashMap<String, Company>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
}

#[allow(dead_code)]
impl MockCompanyRepository {
    /// Create a new empty MockCompanyRepository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a company to the mock repository.
    pub fn add_company(&self, company: Company) {
        let mut companies = self.companies.lock().unwrap();
        companies.insert(company.id.clone(), company);
    }

    /// Add multiple companies to the mock repository.
    pub fn add_companies(&self, companies_list: Vec<Company>) {
        let mut companies = self.companies.lock().unwrap();
        for company in companies_list {
            companies.insert(company.id.clone(), company);
        }
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

    fn matches(company: &Company, filter: &CompanyFilter) -> bool {
        if let Some(query) = &filter.query {
            let query = query.to_lowercase();
            let name_match = company.display_name().to_lowercase().contains(&query);
            let domain_match = company
                .domains
                .iter()
                .any(|domain| domain.to_lowercase().contains(&query));
            if !name_match && !domain_match {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl CompanyRepository for MockCompanyRepository {
    async fn get(&self, id: &str) -> CrmApiResult<Company> {
        self.track_call("get");

        let companies = self.companies.lock().unwrap();
        companies
            .get(id)
            .cloned()
            .ok_or_else(|| CrmApiError::NotFound(format!("Company {} not found", id)))
    }

    async fn search(
        &self,
        filter: &CompanyFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Company>> {
        self.track_call("search");

        let companies = self.companies.lock().unwrap();
        let mut matched: Vec<Company> = companies
            .values()
            .filter(|company| Self::matches(company, filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.id.cmp(&b.id));

        let total_count = matched.len();
        let items: Vec<Company> = matched.into_iter().skip(offset).take(limit).collect();
        Ok(Page::new(items, total_count))
    }

    async fn create(&self, company: &Company) -> CrmApiResult<Company> {
        self.track_call("create");

        let mut companies = self.companies.lock().unwrap();
        if companies.contains_key(&company.id) {
            return Err(CrmApiError::Validation(format!(
                "Company with ID {} already exists",
                company.id
            )));
        }
        companies.insert(company.id.clone(), company.clone());
        Ok(company.clone())
    }

    async fn update(&self, id: &str, changes: &CompanyChanges) -> CrmApiResult<Company> {
        self.track_call("update");

        let mut companies = self.companies.lock().unwrap();
        let company = companies
            .get_mut(id)
            .ok_or_else(|| CrmApiError::NotFound(format!("Company {} not found", id)))?;

        if let Some(name) = &changes.name {
            company.name = Some(name.clone());
        }
        if let Some(description) = &changes.description {
            company.description = Some(description.clone());
        }

        Ok(company.clone())
    }
}

//! HTTP client for the CRM record-store API.
//!
//! This module provides a synchronous HTTP client that can be used from async
//! contexts via `tokio::task::spawn_blocking`. The client handles
//! authentication, error mapping, query-parameter encoding, and the API's
//! response envelopes.

mod async_wrapper;
pub use async_wrapper::{AsyncCrmClient, AsyncCrmClientImpl};

use crate::config::Config;
use crate::error::{CrmApiError, CrmApiResult};
use crate::metrics::Metrics;
use crate::models::*;
use crate::repositories::{
    CommentFilter, CompanyFilter, NoteFilter, OpportunityFilter, Page, PersonFilter, TaskFilter,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Envelope for single-record API responses.
#[derive(Debug, Deserialize)]
pub struct RecordResponse<T> {
    /// The record
    pub data: T,
}

/// Envelope for list API responses.
#[derive(Debug, Deserialize)]
pub struct RecordsResponse<T> {
    /// The records for this page
    pub data: Vec<T>,

    /// Total number of matches across all pages
    #[serde(default)]
    pub total_count: usize,
}

/// HTTP client for the CRM API.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct CrmClient {
    /// Base URL for the CRM API
    base_url: String,

    /// API key for authentication
    api_key: String,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl CrmClient {
    /// Create a new CrmClient from configuration.
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .build();

        Self {
            base_url: config.crm_api_url.clone(),
            api_key: config.crm_api_key.clone(),
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Create a CrmClient with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Self {
            base_url,
            api_key,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Append encoded query parameters to a path.
    fn with_query(path: &str, params: &[(&str, String)]) -> String {
        if params.is_empty() {
            return path.to_string();
        }
        let query: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect();
        format!("{}?{}", path, query.join("&"))
    }

    /// Execute a GET request with authentication.
    fn get(&self, path: &str) -> Result<ureq::Response, CrmApiError> {
        let start = Instant::now();
        let url = self.build_url(path);

        let result = self
            .agent
            .get(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Content-Type", "application/json")
            .call()
            .map_err(|e| self.map_error(e));

        let duration = start.elapsed();
        if result.is_err() {
            self.metrics.record_http_error();
        }
        self.metrics.record_http_request(duration);

        result
    }

    /// Execute a POST request with authentication and JSON body.
    fn post(&self, path: &str, body: &serde_json::Value) -> Result<ureq::Response, CrmApiError> {
        let start = Instant::now();
        let url = self.build_url(path);

        tracing::debug!("POST {}", url);

        let result = self
            .agent
            .post(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Content-Type", "application/json")
            .send_json(body)
            .map_err(|e| self.map_error(e));

        let duration = start.elapsed();
        match &result {
            Ok(response) => {
                tracing::debug!("POST {} - Success (status: {})", url, response.status());
            }
            Err(e) => {
                tracing::error!("POST {} - Error: {:?}", url, e);
                self.metrics.record_http_error();
            }
        }
        self.metrics.record_http_request(duration);
        self.metrics.record_mutation();

        result
    }

    /// Execute a PATCH request with authentication and JSON body.
    fn patch(&self, path: &str, body: &serde_json::Value) -> Result<ureq::Response, CrmApiError> {
        let start = Instant::now();
        let url = self.build_url(path);

        tracing::debug!("PATCH {}", url);

        let result = self
            .agent
            .request("PATCH", &url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Content-Type", "application/json")
            .send_json(body)
            .map_err(|e| self.map_error(e));

        let duration = start.elapsed();
        if result.is_err() {
            self.metrics.record_http_error();
        }
        self.metrics.record_http_request(duration);
        self.metrics.record_mutation();

        result
    }

    /// Map a ureq error to a CrmApiError.
    fn map_error(&self, error: ureq::Error) -> CrmApiError {
        match error {
            ureq::Error::Status(code, response) => {
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());

                match code {
                    401 => CrmApiError::Unauthorized,
                    404 => CrmApiError::NotFound(message),
                    422 => CrmApiError::Validation(message),
                    429 => CrmApiError::RateLimitExceeded,
                    _ => CrmApiError::ApiError {
                        status: code,
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => {
                let message = transport.to_string();
                if message.contains("timed out") || message.contains("timeout") {
                    CrmApiError::Timeout
                } else {
                    CrmApiError::HttpError(message)
                }
            }
        }
    }

    /// Parse a single-record envelope from a response.
    fn parse_record<T: DeserializeOwned>(&self, response: ureq::Response) -> CrmApiResult<T> {
        let envelope: RecordResponse<T> = response
            .into_json()
            .map_err(|e| CrmApiError::HttpError(format!("Failed to read response body: {}", e)))?;
        self.metrics.record_records_fetched(1);
        Ok(envelope.data)
    }

    /// Parse a list envelope from a response into a Page.
    fn parse_page<T: DeserializeOwned>(&self, response: ureq::Response) -> CrmApiResult<Page<T>> {
        let envelope: RecordsResponse<T> = response
            .into_json()
            .map_err(|e| CrmApiError::HttpError(format!("Failed to read response body: {}", e)))?;
        self.metrics.record_records_fetched(envelope.data.len());
        Ok(Page::new(envelope.data, envelope.total_count))
    }

    /// Shared pagination parameters.
    fn page_params(limit: usize, offset: usize) -> Vec<(&'static str, String)> {
        vec![("limit", limit.to_string()), ("offset", offset.to_string())]
    }

    // ---- People ----

    /// Retrieve a single person by ID.
    pub fn get_person(&self, id: &str) -> CrmApiResult<Person> {
        let response = self.get(&format!("/people/{}", urlencoding::encode(id)))?;
        self.parse_record(response)
    }

    /// Search people with pagination.
    pub fn search_people(
        &self,
        filter: &PersonFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Person>> {
        let mut params = Self::page_params(limit, offset);
        if let Some(company_id) = &filter.company_id {
            params.push(("company_id", company_id.clone()));
        }
        if let Some(query) = &filter.query {
            params.push(("query", query.clone()));
        }
        let response = self.get(&Self::with_query("/people", &params))?;
        self.parse_page(response)
    }

    /// Create a new person.
    pub fn create_person(&self, person: &Person) -> CrmApiResult<Person> {
        let body = serde_json::json!({ "data": person });
        let response = self.post("/people", &body)?;
        self.parse_record(response)
    }

    /// Apply a partial update to a person.
    pub fn update_person(&self, id: &str, changes: &PersonChanges) -> CrmApiResult<Person> {
        let body = serde_json::to_value(UpdatePersonRequest {
            changes: changes.clone(),
        })?;
        let response = self.patch(&format!("/people/{}", urlencoding::encode(id)), &body)?;
        self.parse_record(response)
    }

    // ---- Companies ----

    /// Retrieve a single company by ID.
    pub fn get_company(&self, id: &str) -> CrmApiResult<Company> {
        let response = self.get(&format!("/companies/{}", urlencoding::encode(id)))?;
        self.parse_record(response)
    }

    /// Search companies with pagination.
    pub fn search_companies(
        &self,
        filter: &CompanyFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Company>> {
        let mut params = Self::page_params(limit, offset);
        if let Some(query) = &filter.query {
            params.push(("query", query.clone()));
        }
        let response = self.get(&Self::with_query("/companies", &params))?;
        self.parse_page(response)
    }

    /// Create a new company.
    pub fn create_company(&self, company: &Company) -> CrmApiResult<Company> {
        let body = serde_json::json!({ "data": company });
        let response = self.post("/companies", &body)?;
        self.parse_record(response)
    }

    /// Apply a partial update to a company.
    pub fn update_company(&self, id: &str, changes: &CompanyChanges) -> CrmApiResult<Company> {
        let body = serde_json::to_value(UpdateCompanyRequest {
            changes: changes.clone(),
        })?;
        let response = self.patch(&format!("/companies/{}", urlencoding::encode(id)), &body)?;
        self.parse_record(response)
    }

    // ---- Opportunities ----

    /// Retrieve a single opportunity by ID.
    pub fn get_opportunity(&self, id: &str) -> CrmApiResult<Opportunity> {
        let response = self.get(&format!("/opportunities/{}", urlencoding::encode(id)))?;
        self.parse_record(response)
    }

    /// Search opportunities with pagination.
    pub fn search_opportunities(
        &self,
        filter: &OpportunityFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Opportunity>> {
        let mut params = Self::page_params(limit, offset);
        if let Some(company_id) = &filter.company_id {
            params.push(("company_id", company_id.clone()));
        }
        if let Some(poc_id) = &filter.point_of_contact_id {
            params.push(("point_of_contact_id", poc_id.clone()));
        }
        if let Some(stage) = &filter.stage {
            params.push(("stage", stage.clone()));
        }
        let response = self.get(&Self::with_query("/opportunities", &params))?;
        self.parse_page(response)
    }

    /// Create a new opportunity.
    pub fn create_opportunity(&self, opportunity: &Opportunity) -> CrmApiResult<Opportunity> {
        let body = serde_json::json!({ "data": opportunity });
        let response = self.post("/opportunities", &body)?;
        self.parse_record(response)
    }

    /// Apply a partial update to an opportunity.
    pub fn update_opportunity(
        &self,
        id: &str,
        changes: &OpportunityChanges,
    ) -> CrmApiResult<Opportunity> {
        let body = serde_json::to_value(UpdateOpportunityRequest {
            changes: changes.clone(),
        })?;
        let response = self.patch(
            &format!("/opportunities/{}", urlencoding::encode(id)),
            &body,
        )?;
        self.parse_record(response)
    }

    // ---- Tasks ----

    /// Retrieve a single task by ID.
    pub fn get_task(&self, id: &str) -> CrmApiResult<Task> {
        let response = self.get(&format!("/tasks/{}", urlencoding::encode(id)))?;
        self.parse_record(response)
    }

    /// Search tasks with pagination.
    pub fn search_tasks(
        &self,
        filter: &TaskFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Task>> {
        let mut params = Self::page_params(limit, offset);
        if let Some(assignee_id) = &filter.assignee_id {
            params.push(("assignee_id", assignee_id.clone()));
        }
        if let Some(author_id) = &filter.author_id {
            params.push(("author_id", author_id.clone()));
        }
        if let Some(linked) = &filter.linked_to {
            params.push(("linked_record_type", linked.target_type.to_string()));
            params.push(("linked_record_id", linked.target_id.clone()));
        }
        if let Some(date_from) = &filter.date_from {
            params.push(("created_after", date_from.clone()));
        }
        if let Some(date_to) = &filter.date_to {
            params.push(("created_before", date_to.clone()));
        }
        let response = self.get(&Self::with_query("/tasks", &params))?;
        self.parse_page(response)
    }

    /// Create a new task.
    pub fn create_task(&self, task: &Task) -> CrmApiResult<Task> {
        let body = serde_json::json!({ "data": task });
        let response = self.post("/tasks", &body)?;
        self.parse_record(response)
    }

    /// Apply a partial update to a task.
    pub fn update_task(&self, id: &str, changes: &TaskChanges) -> CrmApiResult<Task> {
        let body = serde_json::to_value(UpdateTaskRequest {
            changes: changes.clone(),
        })?;
        let response = self.patch(&format!("/tasks/{}", urlencoding::encode(id)), &body)?;
        self.parse_record(response)
    }

    // ---- Notes ----

    /// Retrieve a single note by ID.
    pub fn get_note(&self, id: &str) -> CrmApiResult<Note> {
        let response = self.get(&format!("/notes/{}", urlencoding::encode(id)))?;
        self.parse_record(response)
    }

    /// Search notes with pagination.
    pub fn search_notes(
        &self,
        filter: &NoteFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Note>> {
        let mut params = Self::page_params(limit, offset);
        if let Some(author_id) = &filter.author_id {
            params.push(("author_id", author_id.clone()));
        }
        if let Some(linked) = &filter.linked_to {
            params.push(("linked_record_type", linked.target_type.to_string()));
            params.push(("linked_record_id", linked.target_id.clone()));
        }
        if let Some(date_from) = &filter.date_from {
            params.push(("created_after", date_from.clone()));
        }
        if let Some(date_to) = &filter.date_to {
            params.push(("created_before", date_to.clone()));
        }
        let response = self.get(&Self::with_query("/notes", &params))?;
        self.parse_page(response)
    }

    /// Create a new note.
    pub fn create_note(&self, note: &Note) -> CrmApiResult<Note> {
        let body = serde_json::json!({ "data": note });
        let response = self.post("/notes", &body)?;
        self.parse_record(response)
    }

    /// Apply a partial update to a note.
    pub fn update_note(&self, id: &str, changes: &NoteChanges) -> CrmApiResult<Note> {
        let body = serde_json::to_value(UpdateNoteRequest {
            changes: changes.clone(),
        })?;
        let response = self.patch(&format!("/notes/{}", urlencoding::encode(id)), &body)?;
        self.parse_record(response)
    }

    // ---- Comments ----

    /// Retrieve a single comment by ID.
    pub fn get_comment(&self, id: &str) -> CrmApiResult<Comment> {
        let response = self.get(&format!("/comments/{}", urlencoding::encode(id)))?;
        self.parse_record(response)
    }

    /// Search comments with pagination.
    pub fn search_comments(
        &self,
        filter: &CommentFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Comment>> {
        let mut params = Self::page_params(limit, offset);
        if let Some(entry) = &filter.entry {
            params.push(("entry_type", entry.target_type.to_string()));
            params.push(("entry_id", entry.target_id.clone()));
        }
        if let Some(author_id) = &filter.author_id {
            params.push(("author_id", author_id.clone()));
        }
        if let Some(date_from) = &filter.date_from {
            params.push(("created_after", date_from.clone()));
        }
        if let Some(date_to) = &filter.date_to {
            params.push(("created_before", date_to.clone()));
        }
        let response = self.get(&Self::with_query("/comments", &params))?;
        self.parse_page(response)
    }

    /// Create a new comment.
    pub fn create_comment(&self, comment: &Comment) -> CrmApiResult<Comment> {
        let body = serde_json::json!({ "data": comment });
        let response = self.post("/comments", &body)?;
        self.parse_record(response)
    }
}

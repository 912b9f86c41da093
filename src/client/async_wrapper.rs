//! Async wrapper around the synchronous CrmClient.
//!
//! This module provides an async interface to the synchronous CrmClient by
//! using `tokio::task::spawn_blocking` to run HTTP operations on a dedicated
//! thread pool, preventing blocking of the async runtime.

use crate::client::CrmClient;
use crate::error::{CrmApiError, CrmApiResult};
use crate::models::*;
use crate::repositories::{
    CommentFilter, CompanyFilter, NoteFilter, OpportunityFilter, Page, PersonFilter, TaskFilter,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Async trait for CRM record-store operations.
///
/// Provides async versions of all CrmClient methods, internally using
/// `tokio::task::spawn_blocking` to avoid blocking the async runtime with
/// synchronous HTTP calls.
#[async_trait]
pub trait AsyncCrmClient: Send + Sync {
    async fn get_person(&self, id: &str) -> CrmApiResult<Person>;
    async fn search_people(
        &self,
        filter: PersonFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Person>>;
    async fn create_person(&self, person: &Person) -> CrmApiResult<Person>;
    async fn update_person(&self, id: &str, changes: &PersonChanges) -> CrmApiResult<Person>;

    async fn get_company(&self, id: &str) -> CrmApiResult<Company>;
    async fn search_companies(
        &self,
        filter: CompanyFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Company>>;
    async fn create_company(&self, company: &Company) -> CrmApiResult<Company>;
    async fn update_company(&self, id: &str, changes: &CompanyChanges) -> CrmApiResult<Company>;

    async fn get_opportunity(&self, id: &str) -> CrmApiResult<Opportunity>;
    async fn search_opportunities(
        &self,
        filter: OpportunityFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Opportunity>>;
    async fn create_opportunity(&self, opportunity: &Opportunity) -> CrmApiResult<Opportunity>;
    async fn update_opportunity(
        &self,
        id: &str,
        changes: &OpportunityChanges,
    ) -> CrmApiResult<Opportunity>;

    async fn get_task(&self, id: &str) -> CrmApiResult<Task>;
    async fn search_tasks(
        &self,
        filter: TaskFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Task>>;
    async fn create_task(&self, task: &Task) -> CrmApiResult<Task>;
    async fn update_task(&self, id: &str, changes: &TaskChanges) -> CrmApiResult<Task>;

    async fn get_note(&self, id: &str) -> CrmApiResult<Note>;
    async fn search_notes(
        &self,
        filter: NoteFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Note>>;
    async fn create_note(&self, note: &Note) -> CrmApiResult<Note>;
    async fn update_note(&self, id: &str, changes: &NoteChanges) -> CrmApiResult<Note>;

    async fn get_comment(&self, id: &str) -> CrmApiResult<Comment>;
    async fn search_comments(
        &self,
        filter: CommentFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Comment>>;
    async fn create_comment(&self, comment: &Comment) -> CrmApiResult<Comment>;
}

/// Async wrapper around the synchronous CrmClient.
#[derive(Clone)]
pub struct AsyncCrmClientImpl {
    client: Arc<CrmClient>,
}

impl AsyncCrmClientImpl {
    pub fn new(client: CrmClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

fn join_error(e: tokio::task::JoinError) -> CrmApiError {
    CrmApiError::HttpError(format!("Task join error: {}", e))
}

#[async_trait]
impl AsyncCrmClient for AsyncCrmClientImpl {
    async fn get_person(&self, id: &str) -> CrmApiResult<Person> {
        let client = self.client.clone();
        let id = id.to_string();

        tokio::task::spawn_blocking(move || client.get_person(&id))
            .await
            .map_err(join_error)?
    }

    async fn search_people(
        &self,
        filter: PersonFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Person>> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.search_people(&filter, limit, offset))
            .await
            .map_err(join_error)?
    }

    async fn create_person(&self, person: &Person) -> CrmApiResult<Person> {
        let client = self.client.clone();
        let person = person.clone();

        tokio::task::spawn_blocking(move || client.create_person(&person))
            .await
            .map_err(join_error)?
    }

    async fn update_person(&self, id: &str, changes: &PersonChanges) -> CrmApiResult<Person> {
        let client = self.client.clone();
        let id = id.to_string();
        let changes = changes.clone();

        tokio::task::spawn_blocking(move || client.update_person(&id, &changes))
            .await
            .map_err(join_error)?
    }

    async fn get_company(&self, id: &str) -> CrmApiResult<Company> {
        let client = self.client.clone();
        let id = id.to_string();

        tokio::task::spawn_blocking(move || client.get_company(&id))
            .await
            .map_err(join_error)?
    }

    async fn search_companies(
        &self,
        filter: CompanyFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Company>> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.search_companies(&filter, limit, offset))
            .await
            .map_err(join_error)?
    }

    async fn create_company(&self, company: &Company) -> CrmApiResult<Company> {
        let client = self.client.clone();
        let company = company.clone();

        tokio::task::spawn_blocking(move || client.create_company(&company))
            .await
            .map_err(join_error)?
    }

    async fn update_company(&self, id: &str, changes: &CompanyChanges) -> CrmApiResult<Company> {
        let client = self.client.clone();
        let id = id.to_string();
        let changes = changes.clone();

        tokio::task::spawn_blocking(move || client.update_company(&id, &changes))
            .await
            .map_err(join_error)?
    }

    async fn get_opportunity(&self, id: &str) -> CrmApiResult<Opportunity> {
        let client = self.client.clone();
        let id = id.to_string();

        tokio::task::spawn_blocking(move || client.get_opportunity(&id))
            .await
            .map_err(join_error)?
    }

    async fn search_opportunities(
        &self,
        filter: OpportunityFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Opportunity>> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.search_opportunities(&filter, limit, offset))
            .await
            .map_err(join_error)?
    }

    async fn create_opportunity(&self, opportunity: &Opportunity) -> CrmApiResult<Opportunity> {
        let client = self.client.clone();
        let opportunity = opportunity.clone();

        tokio::task::spawn_blocking(move || client.create_opportunity(&opportunity))
            .await
            .map_err(join_error)?
    }

    async fn update_opportunity(
        &self,
        id: &str,
        changes: &OpportunityChanges,
    ) -> CrmApiResult<Opportunity> {
        let client = self.client.clone();
        let id = id.to_string();
        let changes = changes.clone();

        tokio::task::spawn_blocking(move || client.update_opportunity(&id, &changes))
            .await
            .map_err(join_error)?
    }

    async fn get_task(&self, id: &str) -> CrmApiResult<Task> {
        let client = self.client.clone();
        let id = id.to_string();

        tokio::task::spawn_blocking(move || client.get_task(&id))
            .await
            .map_err(join_error)?
    }

    async fn search_tasks(
        &self,
        filter: TaskFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Task>> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.search_tasks(&filter, limit, offset))
            .await
            .map_err(join_error)?
    }

    async fn create_task(&self, task: &Task) -> CrmApiResult<Task> {
        let client = self.client.clone();
        let task = task.clone();

        tokio::task::spawn_blocking(move || client.create_task(&task))
            .await
            .map_err(join_error)?
    }

    async fn update_task(&self, id: &str, changes: &TaskChanges) -> CrmApiResult<Task> {
        let client = self.client.clone();
        let id = id.to_string();
        let changes = changes.clone();

        tokio::task::spawn_blocking(move || client.update_task(&id, &changes))
            .await
            .map_err(join_error)?
    }

    async fn get_note(&self, id: &str) -> CrmApiResult<Note> {
        let client = self.client.clone();
        let id = id.to_string();

        tokio::task::spawn_blocking(move || client.get_note(&id))
            .await
            .map_err(join_error)?
    }

    async fn search_notes(
        &self,
        filter: NoteFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Note>> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.search_notes(&filter, limit, offset))
            .await
            .map_err(join_error)?
    }

    async fn create_note(&self, note: &Note) -> CrmApiResult<Note> {
        let client = self.client.clone();
        let note = note.clone();

        tokio::task::spawn_blocking(move || client.create_note(&note))
            .await
            .map_err(join_error)?
    }

    async fn update_note(&self, id: &str, changes: &NoteChanges) -> CrmApiResult<Note> {
        let client = self.client.clone();
        let id = id.to_string();
        let changes = changes.clone();

        tokio::task::spawn_blocking(move || client.update_note(&id, &changes))
            .await
            .map_err(join_error)?
    }

    async fn get_comment(&self, id: &str) -> CrmApiResult<Comment> {
        let client = self.client.clone();
        let id = id.to_string();

        tokio::task::spawn_blocking(move || client.get_comment(&id))
            .await
            .map_err(join_error)?
    }

    async fn search_comments(
        &self,
        filter: CommentFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Comment>> {
        let client = self.client.clone();

        tokio::task::spawn_blocking(move || client.search_comments(&filter, limit, offset))
            .await
            .map_err(join_error)?
    }

    async fn create_comment(&self, comment: &Comment) -> CrmApiResult<Comment> {
        let client = self.client.clone();
        let comment = comment.clone();

        tokio::task::spawn_blocking(move || client.create_comment(&comment))
            .await
            .map_err(join_error)?
    }
}

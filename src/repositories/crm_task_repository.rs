use crate::client::AsyncCrmClient;
use crate::error::CrmApiResult;
use crate::models::{Task, TaskChanges};
use crate::repositories::traits::{Page, TaskFilter, TaskRepository};
use async_trait::async_trait;
use std::sync::Arc;

/// Task repository implementation backed by the CRM API client.
pub struct CrmTaskRepository {
    client: Arc<dyn AsyncCrmClient>,
}

impl CrmTaskRepository {
    /// Create a new CrmTaskRepository with the given client.
    pub fn new(client: Arc<dyn AsyncCrmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TaskRepository for CrmTaskRepository {
    async fn get(&self, id: &str) -> CrmApiResult<Task> {
        self.client.get_task(id).await
    }

    async fn search(
        &self,
        filter: &TaskFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Task>> {
        self.client.search_tasks(filter.clone(), limit, offset).await
    }

    async fn create(&self, task: &Task) -> CrmApiResult<Task> {
        self.client.create_task(task).await
    }

    async fn update(&self, id: &str, changes: &TaskChanges) -> CrmApiResult<Task> {
        self.client.update_task(id, changes).await
    }
}

use async_trait::async_trait;
use crm_mcp_server::error::{CrmApiError, CrmApiResult};
use crm_mcp_server::models::{Task, TaskChanges};
use crm_mcp_server::repositories::{Page, TaskFilter, TaskRepository};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock task repository for testing.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockTaskRepository {
    tasks: Arc<Mutex<HashMap<String, Task>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
}

#[allow(dead_code)]
impl MockTaskRepository {
    /// Create a new empty MockTaskRepository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task to the mock repository.
    pub fn add_task(&self, task: Task) {
        let mut tasks = self.tasks.lock().unwrap();
        tasks.insert(task.id.clone(), task);
    }

    /// Add multiple tasks to the mock repository.
    pub fn add_tasks(&self, tasks_list: Vec<Task>) {
        let mut tasks = self.tasks.lock().unwrap();
        for task in tasks_list {
            tasks.insert(task.id.clone(), task);
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

    fn matches(task: &Task, filter: &TaskFilter) -> bool {
        if let Some(assignee_id) = &filter.assignee_id {
            if task.assignee_id.as_deref() != Some(assignee_id.as_str()) {
                return false;
            }
        }
        if let Some(author_id) = &filter.author_id {
            let matches_author = task
                .author
                .as_ref()
                .map(|author| author.id == *author_id)
                .unwrap_or(false);
            if !matches_author {
                return false;
            }
        }
        if let Some(linked) = &filter.linked_to {
            let is_linked = task
                .linked_records
                .iter()
                .any(|reference| reference.points_at(linked.target_type, &linked.target_id));
            if !is_linked {
                return false;
            }
        }
        if let Some(date_from) = &filter.date_from {
            if task.created_at.as_str() < date_from.as_str() {
                return false;
            }
        }
        if let Some(date_to) = &filter.date_to {
            if task.created_at.as_str() > date_to.as_str() {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl TaskRepository for MockTaskRepository {
    async fn get(&self, id: &str) -> CrmApiResult<Task> {
        self.track_call("get");

        let tasks = self.tasks.lock().unwrap();
        tasks
            .get(id)
            .cloned()
            .ok_or_else(|| CrmApiError::NotFound(format!("Task {} not found", id)))
    }

    async fn search(
        &self,
        filter: &TaskFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Task>> {
        self.track_call("search");

        let tasks = self.tasks.lock().unwrap();
        let mut matched: Vec<Task> = tasks
            .values()
            .filter(|task| Self::matches(task, filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.id.cmp(&b.id));

        let total_count = matched.len();
        let items: Vec<Task> = matched.into_iter().skip(offset).take(limit).collect();
        Ok(Page::new(items, total_count))
    }

    async fn create(&self, task: &Task) -> CrmApiResult<Task> {
        self.track_call("create");

        let mut tasks = self.tasks.lock().unwrap();
        if tasks.contains_key(&task.id) {
            return Err(CrmApiError::Validation(format!(
                "Task with ID {} already exists",
                task.id
            )));
        }
        tasks.insert(task.id.clone(), task.clone());
        Ok(task.clone())
    }

    async fn update(&self, id: &str, changes: &TaskChanges) -> CrmApiResult<Task> {
        self.track_call("update");

        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| CrmApiError::NotFound(format!("Task {} not found", id)))?;

        if let Some(status) = &changes.status {
            task.status = Some(status.clone());
        }
        if let Some(assignee) = &changes.assignee {
            task.assignee_id = assignee["target_id"].as_str().map(String::from);
        }
        if let Some(due_at) = &changes.due_at {
            task.due_at = Some(due_at.clone());
        }

        Ok(task.clone())
    }
}

use async_trait::async_trait;
use crm_mcp_server::error::{CrmApiError, CrmApiResult};
use crm_mcp_server::models::Comment;
use crm_mcp_server::repositories::{CommentFilter, CommentRepository, Page};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock comment repository for testing.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockCommentRepository {
    comments: Arc<Mutex<HashMap<String, Comment>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
}

#[allow(dead_code)]
impl MockCommentRepository {
    /// Create a new empty MockCommentRepository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a comment to the mock repository.
    pub fn add_comment(&self, comment: Comment) {
        let mut comments = self.comments.lock().unwrap();
        comments.insert(comment.id.clone(), comment);
    }

    /// Add multiple comments to the mock repository.
    pub fn add_comments(&self, comments_list: Vec<Comment>) {
        let mut comments = self.comments.lock().unwrap();
        for comment in comments_list {
            comments.insert(comment.id.clone(), comment);
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

    fn matches(comment: &Comment, filter: &CommentFilter) -> bool {
        if let Some(entry) = &filter.entry {
            let attached = comment
                .entry
                .as_ref()
                .map(|reference| reference.points_at(entry.target_type, &entry.target_id))
                .unwrap_or(false);
            if !attached {
                return false;
            }
        }
        if let Some(author_id) = &filter.author_id {
            let matches_author = comment
                .author
                .as_ref()
                .map(|author| author.id == *author_id)
                .unwrap_or(false);
            if !matches_author {
                return false;
            }
        }
        if let Some(date_from) = &filter.date_from {
            if comment.created_at.as_str() < date_from.as_str() {
                return false;
            }
        }
        if let Some(date_to) = &filter.date_to {
            if comment.created_at.as_str() > date_to.as_str() {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl CommentRepository for MockCommentRepository {
    async fn get(&self, id: &str) -> CrmApiResult<Comment> {
        self.track_call("get");

        let comments = self.comments.lock().unwrap();
        comments
            .get(id)
            .cloned()
            .ok_or_else(|| CrmApiError::NotFound(format!("Comment {} not found", id)))
    }

    async fn search(
        &self,
        filter: &CommentFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Comment>> {
        self.track_call("search");

        let comments = self.comments.lock().unwrap();
        let mut matched: Vec<Comment> = comments
            .values()
            .filter(|comment| Self::matches(comment, filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.id.cmp(&b.id));

        let total_count = matched.len();
        let items: Vec<Comment> = matched.into_iter().skip(offset).take(limit).collect();
        Ok(Page::new(items, total_count))
    }

    async fn create(&self, comment: &Comment) -> CrmApiResult<Comment> {
        self.track_call("create");

        let mut comments = self.comments.lock().unwrap();
        if comments.contains_key(&comment.id) {
            return Err(CrmApiError::Validation(format!(
                "Comment with ID {} already exists",
                comment.id
            )));
        }
        comments.insert(comment.id.clone(), comment.clone());
        Ok(comment.clone())
    }
}

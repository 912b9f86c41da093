use crate::client::AsyncCrmClient;
use crate::error::CrmApiResult;
use crate::models::Comment;
use crate::repositories::traits::{CommentFilter, CommentRepository, Page};
use async_trait::async_trait;
use std::sync::Arc;

/// Comment repository implementation backed by the CRM API client.
pub struct CrmCommentRepository {
    client: Arc<dyn AsyncCrmClient>,
}

impl CrmCommentRepository {
    /// Create a new CrmCommentRepository with the given client.
    pub fn new(client: Arc<dyn AsyncCrmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CommentRepository for CrmCommentRepository {
    async fn get(&self, id: &str) -> CrmApiResult<Comment> {
        self.client.get_comment(id).await
    }

    async fn search(
        &self,
        filter: &CommentFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Comment>> {
        self.client
            .search_comments(filter.clone(), limit, offset)
            .await
    }

    async fn create(&self, comment: &Comment) -> CrmApiResult<Comment> {
        self.client.create_comment(comment).await
    }
}

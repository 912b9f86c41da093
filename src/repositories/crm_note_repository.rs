use crate::client::AsyncCrmClient;
use crate::error::CrmApiResult;
use crate::models::{Note, NoteChanges};
use crate::repositories::traits::{NoteFilter, NoteRepository, Page};
use async_trait::async_trait;
use std::sync::Arc;

/// Note repository implementation backed by the CRM API client.
pub struct CrmNoteRepository {
    client: Arc<dyn AsyncCrmClient>,
}

impl CrmNoteRepository {
    /// Create a new CrmNoteRepository with the given client.
    pub fn new(client: Arc<dyn AsyncCrmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NoteRepository for CrmNoteRepository {
    async fn get(&self, id: &str) -> CrmApiResult<Note> {
        self.client.get_note(id).await
    }

    async fn search(
        &self,
        filter: &NoteFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Note>> {
        self.client.search_notes(filter.clone(), limit, offset).await
    }

    async fn create(&self, note: &Note) -> CrmApiResult<Note> {
        self.client.create_note(note).await
    }

    async fn update(&self, id: &str, changes: &NoteChanges) -> CrmApiResult<Note> {
        self.client.update_note(id, changes).await
    }
}

use async_trait::async_trait;
use crm_mcp_server::error::{CrmApiError, CrmApiResult};
use crm_mcp_server::models::{Note, NoteChanges};
use crm_mcp_server::repositories::{NoteFilter, NoteRepository, Page};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock note repository for testing.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockNoteRepository {
    notes: Arc<Mutex<HashMap<String, Note>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
}

#[allow(dead_code)]
impl MockNoteRepository {
    /// Create a new empty MockNoteRepository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a note to the mock repository.
    pub fn add_note(&self, note: Note) {
        let mut notes = self.notes.lock().unwrap();
        notes.insert(note.id.clone(), note);
    }

    /// Add multiple notes to the mock repository.
    pub fn add_notes(&self, notes_list: Vec<Note>) {
        let mut notes = self.notes.lock().unwrap();
        for note in notes_list {
            notes.insert(note.id.clone(), note);
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

    fn matches(note: &Note, filter: &NoteFilter) -> bool {
        if let Some(author_id) = &filter.author_id {
            let matches_author = note
                .author
                .as_ref()
                .map(|author| author.id == *author_id)
                .unwrap_or(false);
            if !matches_author {
                return false;
            }
        }
        if let Some(linked) = &filter.linked_to {
            let is_linked = note
                .linked_records
                .iter()
                .any(|reference| reference.points_at(linked.target_type, &linked.target_id));
            if !is_linked {
                return false;
            }
        }
        if let Some(date_from) = &filter.date_from {
            if note.created_at.as_str() < date_from.as_str() {
                return false;
            }
        }
        if let Some(date_to) = &filter.date_to {
            if note.created_at.as_str() > date_to.as_str() {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl NoteRepository for MockNoteRepository {
    async fn get(&self, id: &str) -> CrmApiResult<Note> {
        self.track_call("get");

        let notes = self.notes.lock().unwrap();
        notes
            .get(id)
            .cloned()
            .ok_or_else(|| CrmApiError::NotFound(format!("Note {} not found", id)))
    }

    async fn search(
        &self,
        filter: &NoteFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Note>> {
        self.track_call("search");

        let notes = self.notes.lock().unwrap();
        let mut matched: Vec<Note> = notes
            .values()
            .filter(|note| Self::matches(note, filter))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.id.cmp(&b.id));

        let total_count = matched.len();
        let items: Vec<Note> = matched.into_iter().skip(offset).take(limit).collect();
        Ok(Page::new(items, total_count))
    }

    async fn create(&self, note: &Note) -> CrmApiResult<Note> {
        self.track_call("create");

        let mut notes = self.notes.lock().unwrap();
        if notes.contains_key(&note.id) {
            return Err(CrmApiError::Validation(format!(
                "Note with ID {} already exists",
                note.id
            )));
        }
        notes.insert(note.id.clone(), note.clone());
        Ok(note.clone())
    }

    async fn update(&self, id: &str, changes: &NoteChanges) -> CrmApiResult<Note> {
        self.track_call("update");

        let mut notes = self.notes.lock().unwrap();
        let note = notes
            .get_mut(id)
            .ok_or_else(|| CrmApiError::NotFound(format!("Note {} not found", id)))?;

        if let Some(title) = &changes.title {
            note.title = Some(title.clone());
        }
        if let Some(body) = &changes.body {
            note.body = Some(body.clone());
        }

        Ok(note.clone())
    }
}

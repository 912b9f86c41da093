//! Activity timeline aggregation.
//!
//! Merges task and note records (and, for entity-scoped timelines, comments)
//! into one time-ordered, paginated activity feed. Each source is fetched
//! completely, then a single pagination window is applied over the merged
//! sequence rather than per source.

use crate::error::{CrmApiError, CrmApiResult};
use crate::models::{Comment, EntityType, Note, RecordReference, Task};
use crate::repositories::{
    CommentFilter, CommentRepository, NoteFilter, NoteRepository, Page, TaskFilter, TaskRepository,
};
use crate::tools::merge::{merge_all, merge_window};
use std::cmp::Ordering;
use std::sync::Arc;

/// Default number of activities per timeline page.
pub const DEFAULT_ACTIVITY_LIMIT: usize = 20;

/// The kind of record behind an activity item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Task,
    Note,
    Comment,
}

impl ActivityKind {
    /// The lowercase tag used in tool output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Task => "task",
            ActivityKind::Note => "note",
            ActivityKind::Comment => "comment",
        }
    }

    /// Parse a type token from an activity filter.
    ///
    /// Only `task` and `note` are selectable; comments enter a timeline
    /// through entity scoping, never through the type filter.
    pub fn parse_filter_token(token: &str) -> CrmApiResult<Self> {
        match token {
            "task" => Ok(ActivityKind::Task),
            "note" => Ok(ActivityKind::Note),
            other => Err(CrmApiError::Validation(format!(
                "unknown activity type: {}",
                other
            ))),
        }
    }

    /// Parse all type tokens from an activity filter.
    pub fn parse_filter_tokens(tokens: &[String]) -> CrmApiResult<Vec<Self>> {
        tokens
            .iter()
            .map(|token| Self::parse_filter_token(token))
            .collect()
    }
}

/// One entry in an activity timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityItem {
    /// ID of the underlying record
    pub id: String,

    /// Which record type produced this item
    pub kind: ActivityKind,

    /// Short title, if the record has one
    pub title: Option<String>,

    /// Body text, if the record has one
    pub body: Option<String>,

    /// Task workflow status; only present for task items
    pub status: Option<String>,

    /// When the underlying record was created (ISO 8601 timestamp)
    pub created_at: String,

    /// ID of the authoring workspace member, if recorded
    pub author_id: Option<String>,

    /// Author first/last name resolved to a display string, if present
    pub author_name: Option<String>,
}

impl From<Task> for ActivityItem {
    fn from(task: Task) -> Self {
        let author_id = task.author.as_ref().map(|a| a.id.clone());
        let author_name = task.author.as_ref().and_then(|a| a.display_name());
        Self {
            id: task.id,
            kind: ActivityKind::Task,
            title: task.title,
            body: task.body,
            status: task.status,
            created_at: task.created_at,
            author_id,
            author_name,
        }
    }
}

impl From<Note> for ActivityItem {
    fn from(note: Note) -> Self {
        let author_id = note.author.as_ref().map(|a| a.id.clone());
        let author_name = note.author.as_ref().and_then(|a| a.display_name());
        Self {
            id: note.id,
            kind: ActivityKind::Note,
            title: note.title,
            body: note.body,
            status: None,
            created_at: note.created_at,
            author_id,
            author_name,
        }
    }
}

impl From<Comment> for ActivityItem {
    fn from(comment: Comment) -> Self {
        let author_id = comment.author.as_ref().map(|a| a.id.clone());
        let author_name = comment.author.as_ref().and_then(|a| a.display_name());
        Self {
            id: comment.id,
            kind: ActivityKind::Comment,
            title: None,
            body: comment.body,
            status: None,
            created_at: comment.created_at,
            author_id,
            author_name,
        }
    }
}

/// Total order over activity items: creation time descending, then id
/// ascending so items sharing a timestamp sort identically on every call.
pub fn activity_order(a: &ActivityItem, b: &ActivityItem) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// Parameters for filtering activities.
#[derive(Debug, Clone)]
pub struct ActivityFilter {
    /// Record kinds to include; both when absent
    pub types: Option<Vec<ActivityKind>>,

    /// Created-at lower bound (inclusive, ISO 8601)
    pub date_from: Option<String>,

    /// Created-at upper bound (inclusive, ISO 8601)
    pub date_to: Option<String>,

    /// Only activities authored by this workspace member
    pub author_id: Option<String>,

    /// Page size
    pub limit: usize,

    /// Window start within the merged sequence
    pub offset: usize,
}

impl Default for ActivityFilter {
    fn default() -> Self {
        Self {
            types: None,
            date_from: None,
            date_to: None,
            author_id: None,
            limit: DEFAULT_ACTIVITY_LIMIT,
            offset: 0,
        }
    }
}

impl ActivityFilter {
    fn includes(&self, kind: ActivityKind) -> bool {
        match &self.types {
            Some(kinds) => kinds.contains(&kind),
            None => true,
        }
    }
}

/// A paginated, time-ordered activity feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    /// Activities inside the requested window, newest first
    pub activities: Vec<ActivityItem>,

    /// Total matches across all sources before windowing
    pub total_count: usize,

    /// Whether activities exist beyond this window
    pub has_more: bool,
}

/// Activity timeline aggregation over tasks, notes, and comments.
pub struct ActivityTimelineTools {
    task_repo: Arc<dyn TaskRepository>,
    note_repo: Arc<dyn NoteRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    page_size: usize,
}

impl ActivityTimelineTools {
    /// Create new activity timeline tools.
    ///
    /// # Arguments
    /// * `task_repo` - TaskRepository for task data access
    /// * `note_repo` - NoteRepository for note data access
    /// * `comment_repo` - CommentRepository for comment data access
    /// * `page_size` - Chunk size when paging through the record store
    pub fn new(
        task_repo: Arc<dyn TaskRepository>,
        note_repo: Arc<dyn NoteRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        page_size: usize,
    ) -> Self {
        Self {
            task_repo,
            note_repo,
            comment_repo,
            page_size,
        }
    }

    /// Get a merged, paginated activity feed across tasks and notes.
    ///
    /// Both sources are fetched independently (and concurrently), merged into
    /// one sequence ordered by creation time descending, then the
    /// offset/limit window is applied once over the merged sequence.
    pub async fn get_activities(&self, filter: &ActivityFilter) -> CrmApiResult<Timeline> {
        let (tasks, notes) = futures::try_join!(
            self.fetch_task_source(filter),
            self.fetch_note_source(filter),
        )?;

        let window = merge_window(vec![tasks, notes], activity_order, filter.limit, filter.offset);

        Ok(Timeline {
            activities: window.items,
            total_count: window.total_count,
            has_more: window.has_more,
        })
    }

    /// Get the raw matched activity sequence, optionally narrowed by task
    /// status.
    ///
    /// The status filter applies only to task items; notes carry no status
    /// and are excluded from a status-filtered result.
    pub async fn filter_activities(
        &self,
        filter: &ActivityFilter,
        status: Option<&str>,
    ) -> CrmApiResult<Vec<ActivityItem>> {
        let (tasks, notes) = futures::try_join!(
            self.fetch_task_source(filter),
            self.fetch_note_source(filter),
        )?;

        let sources = match status {
            Some(status) => {
                let mut tasks = tasks;
                tasks
                    .items
                    .retain(|item| item.status.as_deref() == Some(status));
                tasks.total_count = tasks.items.len();
                vec![tasks]
            }
            None => vec![tasks, notes],
        };

        Ok(merge_all(sources, activity_order))
    }

    /// Get a paginated activity feed scoped to one entity.
    ///
    /// Tasks and notes whose relation points at the entity are merged; when
    /// `include_comments` is true, comments attached to the entity join the
    /// merge under the same ordering and windowing rule.
    pub async fn get_entity_activities(
        &self,
        entity_id: &str,
        entity_type: EntityType,
        include_comments: bool,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Timeline> {
        let linked = RecordReference::new(entity_type, entity_id);

        let task_filter = TaskFilter {
            linked_to: Some(linked.clone()),
            ..Default::default()
        };
        let note_filter = NoteFilter {
            linked_to: Some(linked.clone()),
            ..Default::default()
        };
        let comment_filter = CommentFilter {
            entry: Some(linked),
            ..Default::default()
        };

        let (tasks, notes, comments) = futures::try_join!(
            self.fetch_all_tasks(task_filter),
            self.fetch_all_notes(note_filter),
            async {
                if include_comments {
                    self.fetch_all_comments(comment_filter).await
                } else {
                    Ok(Page::empty())
                }
            },
        )?;

        let window = merge_window(vec![tasks, notes, comments], activity_order, limit, offset);

        Ok(Timeline {
            activities: window.items,
            total_count: window.total_count,
            has_more: window.has_more,
        })
    }

    /// Fetch the complete task source for a filter, or an empty source when
    /// tasks are excluded by the type filter.
    async fn fetch_task_source(&self, filter: &ActivityFilter) -> CrmApiResult<Page<ActivityItem>> {
        if !filter.includes(ActivityKind::Task) {
            return Ok(Page::empty());
        }
        let task_filter = TaskFilter {
            author_id: filter.author_id.clone(),
            date_from: filter.date_from.clone(),
            date_to: filter.date_to.clone(),
            ..Default::default()
        };
        self.fetch_all_tasks(task_filter).await
    }

    /// Fetch the complete note source for a filter, or an empty source when
    /// notes are excluded by the type filter.
    async fn fetch_note_source(&self, filter: &ActivityFilter) -> CrmApiResult<Page<ActivityItem>> {
        if !filter.includes(ActivityKind::Note) {
            return Ok(Page::empty());
        }
        let note_filter = NoteFilter {
            author_id: filter.author_id.clone(),
            date_from: filter.date_from.clone(),
            date_to: filter.date_to.clone(),
            ..Default::default()
        };
        self.fetch_all_notes(note_filter).await
    }

    /// Fetch all tasks matching a filter, handling pagination.
    async fn fetch_all_tasks(&self, filter: TaskFilter) -> CrmApiResult<Page<ActivityItem>> {
        let mut items: Vec<ActivityItem> = Vec::new();
        let mut offset = 0;
        let mut total_count = 0;

        loop {
            let page = self.task_repo.search(&filter, self.page_size, offset).await?;
            let count = page.items.len();
            total_count = page.total_count;
            items.extend(page.items.into_iter().map(ActivityItem::from));

            if count < self.page_size {
                break;
            }
            offset += self.page_size;
        }

        Ok(Page::new(items, total_count))
    }

    /// Fetch all notes matching a filter, handling pagination.
    async fn fetch_all_notes(&self, filter: NoteFilter) -> CrmApiResult<Page<ActivityItem>> {
        let mut items: Vec<ActivityItem> = Vec::new();
        let mut offset = 0;
        let mut total_count = 0;

        loop {
            let page = self.note_repo.search(&filter, self.page_size, offset).await?;
            let count = page.items.len();
            total_count = page.total_count;
            items.extend(page.items.into_iter().map(ActivityItem::from));

            if count < self.page_size {
                break;
            }
            offset += self.page_size;
        }

        Ok(Page::new(items, total_count))
    }

    /// Fetch all comments matching a filter, handling pagination.
    async fn fetch_all_comments(&self, filter: CommentFilter) -> CrmApiResult<Page<ActivityItem>> {
        let mut items: Vec<ActivityItem> = Vec::new();
        let mut offset = 0;
        let mut total_count = 0;

        loop {
            let page = self
                .comment_repo
                .search(&filter, self.page_size, offset)
                .await?;
            let count = page.items.len();
            total_count = page.total_count;
            items.extend(page.items.into_iter().map(ActivityItem::from));

            if count < self.page_size {
                break;
            }
            offset += self.page_size;
        }

        Ok(Page::new(items, total_count))
    }
}

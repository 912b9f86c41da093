//! Repository traits forming the typed record-access interface.
//!
//! One repository per entity type, each offering `get`, filtered `search`
//! with limit/offset pagination, `create`, and partial `update`. Every
//! aggregation in this crate reaches the record store exclusively through
//! these traits, enabling different implementations (API client, mock).

use crate::error::CrmApiResult;
use crate::models::*;
use async_trait::async_trait;

/// One page of search results plus the total match count across all pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// The items in this page
    pub items: Vec<T>,

    /// Total number of matches before pagination
    pub total_count: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: usize) -> Self {
        Self { items, total_count }
    }

    /// An empty page with zero matches.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }
}

/// Filter predicate for person searches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonFilter {
    /// Equality on the company reference
    pub company_id: Option<String>,

    /// Free-text query over name/email
    pub query: Option<String>,
}

/// Filter predicate for company searches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyFilter {
    /// Free-text query over name/domain
    pub query: Option<String>,
}

/// Filter predicate for opportunity searches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpportunityFilter {
    /// Equality on the company reference
    pub company_id: Option<String>,

    /// Equality on the point-of-contact reference
    pub point_of_contact_id: Option<String>,

    /// Equality on the sales stage
    pub stage: Option<String>,
}

/// Filter predicate for task searches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    /// Equality on the assignee reference
    pub assignee_id: Option<String>,

    /// Equality on the author reference
    pub author_id: Option<String>,

    /// Tasks linked to a specific record
    pub linked_to: Option<RecordReference>,

    /// Created-at lower bound (inclusive, ISO 8601)
    pub date_from: Option<String>,

    /// Created-at upper bound (inclusive, ISO 8601)
    pub date_to: Option<String>,
}

/// Filter predicate for note searches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteFilter {
    /// Equality on the author reference
    pub author_id: Option<String>,

    /// Notes linked to a specific record
    pub linked_to: Option<RecordReference>,

    /// Created-at lower bound (inclusive, ISO 8601)
    pub date_from: Option<String>,

    /// Created-at upper bound (inclusive, ISO 8601)
    pub date_to: Option<String>,
}

/// Filter predicate for comment searches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentFilter {
    /// Comments attached to a specific record
    pub entry: Option<RecordReference>,

    /// Equality on the author reference
    pub author_id: Option<String>,

    /// Created-at lower bound (inclusive, ISO 8601)
    pub date_from: Option<String>,

    /// Created-at upper bound (inclusive, ISO 8601)
    pub date_to: Option<String>,
}

/// Repository for person records.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Retrieve a single person by ID.
    async fn get(&self, id: &str) -> CrmApiResult<Person>;

    /// Search people with pagination.
    async fn search(
        &self,
        filter: &PersonFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Person>>;

    /// Create a new person.
    async fn create(&self, person: &Person) -> CrmApiResult<Person>;

    /// Apply a partial update to a person.
    async fn update(&self, id: &str, changes: &PersonChanges) -> CrmApiResult<Person>;
}

/// Repository for company records.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Retrieve a single company by ID.
    async fn get(&self, id: &str) -> CrmApiResult<Company>;

    /// Search companies with pagination.
    async fn search(
        &self,
        filter: &CompanyFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Company>>;

    /// Create a new company.
    async fn create(&self, company: &Company) -> CrmApiResult<Company>;

    /// Apply a partial update to a company.
    async fn update(&self, id: &str, changes: &CompanyChanges) -> CrmApiResult<Company>;
}

/// Repository for opportunity records.
#[async_trait]
pub trait OpportunityRepository: Send + Sync {
    /// Retrieve a single opportunity by ID.
    async fn get(&self, id: &str) -> CrmApiResult<Opportunity>;

    /// Search opportunities with pagination.
    async fn search(
        &self,
        filter: &OpportunityFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Opportunity>>;

    /// Create a new opportunity.
    async fn create(&self, opportunity: &Opportunity) -> CrmApiResult<Opportunity>;

    /// Apply a partial update to an opportunity.
    async fn update(&self, id: &str, changes: &OpportunityChanges) -> CrmApiResult<Opportunity>;
}

/// Repository for task records.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Retrieve a single task by ID.
    async fn get(&self, id: &str) -> CrmApiResult<Task>;

    /// Search tasks with pagination.
    async fn search(
        &self,
        filter: &TaskFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Task>>;

    /// Create a new task.
    async fn create(&self, task: &Task) -> CrmApiResult<Task>;

    /// Apply a partial update to a task.
    async fn update(&self, id: &str, changes: &TaskChanges) -> CrmApiResult<Task>;
}

/// Repository for note records.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Retrieve a single note by ID.
    async fn get(&self, id: &str) -> CrmApiResult<Note>;

    /// Search notes with pagination.
    async fn search(
        &self,
        filter: &NoteFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Note>>;

    /// Create a new note.
    async fn create(&self, note: &Note) -> CrmApiResult<Note>;

    /// Apply a partial update to a note.
    async fn update(&self, id: &str, changes: &NoteChanges) -> CrmApiResult<Note>;
}

/// Repository for comment records.
///
/// Comments are append-only threads; the store offers no comment update.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Retrieve a single comment by ID.
    async fn get(&self, id: &str) -> CrmApiResult<Comment>;

    /// Search comments with pagination.
    async fn search(
        &self,
        filter: &CommentFilter,
        limit: usize,
        offset: usize,
    ) -> CrmApiResult<Page<Comment>>;

    /// Create a new comment.
    async fn create(&self, comment: &Comment) -> CrmApiResult<Comment>;
}

//! Data models for CRM entities.
//!
//! This module contains the canonical structures for people, companies,
//! opportunities, tasks, notes, and comments. Custom deserializers unwrap the
//! API's nested wrapper objects (name objects, email/domain entry arrays,
//! {target_id} references, money values) so the rest of the crate never
//! repeats that null-guard logic.

pub mod comment;
pub mod company;
pub mod money;
pub mod note;
pub mod opportunity;
pub mod person;
pub mod record;
pub mod task;

pub use comment::Comment;
pub use company::{Company, CompanyChanges, UpdateCompanyRequest};
pub use money::{Money, MICROS_PER_UNIT};
pub use note::{Note, NoteChanges, UpdateNoteRequest};
pub use opportunity::{Opportunity, OpportunityChanges, UpdateOpportunityRequest};
pub use person::{Person, PersonChanges, PersonName, UpdatePersonRequest};
pub use record::{EntityType, RecordAuthor, RecordReference};
pub use task::{Task, TaskChanges, UpdateTaskRequest};

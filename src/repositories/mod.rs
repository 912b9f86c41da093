//! Repository layer abstracting record storage and retrieval.
//!
//! Defines one repository trait per entity type plus API-backed
//! implementations delegating to the async CRM client.

mod crm_comment_repository;
mod crm_company_repository;
mod crm_note_repository;
mod crm_opportunity_repository;
mod crm_person_repository;
mod crm_task_repository;
pub mod traits;

pub use crm_comment_repository::CrmCommentRepository;
pub use crm_company_repository::CrmCompanyRepository;
pub use crm_note_repository::CrmNoteRepository;
pub use crm_opportunity_repository::CrmOpportunityRepository;
pub use crm_person_repository::CrmPersonRepository;
pub use crm_task_repository::CrmTaskRepository;
pub use traits::{
    CommentFilter, CommentRepository, CompanyFilter, CompanyRepository, NoteFilter,
    NoteRepository, OpportunityFilter, OpportunityRepository, Page, PersonFilter,
    PersonRepository, TaskFilter, TaskRepository,
};

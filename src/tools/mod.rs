//! Cross-entity aggregation tools over the CRM record store.
//!
//! This module provides four categories of derived views:
//! - **Timeline**: merged, paginated activity feeds over tasks, notes, comments
//! - **Relationships**: per-entity relation views and link/transfer mutations
//! - **Orphans**: full-store sweep for records missing expected relationships
//! - **Pipeline**: opportunities grouped by sales stage with micro-unit sums
//!
//! The shared fetch-then-merge-then-paginate step lives in [`merge`].

pub mod merge;
pub mod orphans;
pub mod pipeline;
pub mod relationships;
pub mod timeline;

pub use merge::{merge_all, merge_window, MergedWindow};
pub use orphans::{
    OrphanReport, OrphanScanTools, OrphanedCompany, OrphanedContact, OrphanedOpportunity,
    OrphanedTask,
};
pub use pipeline::{PipelineTools, StageGroup, StageGroups, NO_STAGE_LABEL};
pub use relationships::{
    CompanyContacts, LinkedOpportunity, OpportunityWithCompany, PersonOpportunities,
    RelationshipSummary, RelationshipTools, TransferredContact,
};
pub use timeline::{
    ActivityFilter, ActivityItem, ActivityKind, ActivityTimelineTools, Timeline,
    DEFAULT_ACTIVITY_LIMIT,
};

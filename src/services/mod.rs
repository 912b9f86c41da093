//! Service layer providing validated business operations.
//!
//! Services sit between the MCP handlers and the aggregation tools,
//! validating flat tool arguments before delegating.

pub mod activity_service;
pub mod insight_service;
pub mod relationship_service;

pub use activity_service::{ActivityService, ActivityServiceImpl};
pub use insight_service::{InsightService, InsightServiceImpl};
pub use relationship_service::{RelationshipService, RelationshipServiceImpl};

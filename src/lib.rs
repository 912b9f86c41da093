//! CRM MCP Server - A Rust implementation of the Model Context Protocol server
//! for a CRM entity graph.
//!
//! This library provides a production-quality MCP server that enables AI
//! assistants to work with a CRM's people, companies, opportunities, tasks,
//! notes, and comments through derived cross-entity views: merged activity
//! timelines, relationship aggregations and mutations, orphaned-record
//! sweeps, and pipeline stage grouping.
//!
//! # Architecture
//!
//! - **models**: Canonical data structures with nested-wrapper normalization
//! - **error**: Custom error types for precise error handling
//! - **config**: Configuration management from environment variables
//! - **client**: HTTP client for the CRM record-store API
//! - **repositories**: Typed record-access traits and API-backed implementations
//! - **tools**: Cross-entity aggregation engine
//! - **services**: Validated business operations over the tools
//! - **server**: MCP protocol server

// Re-export commonly used types
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod repositories;
pub mod server;
pub mod services;
pub mod tools;

pub use client::CrmClient;
pub use config::Config;
pub use error::{ConfigError, CrmApiError};
pub use metrics::{Metrics, MetricsSummary};
pub use models::{
    Comment, Company, EntityType, Money, Note, Opportunity, Person, RecordAuthor, RecordReference,
    Task,
};
pub use server::CrmMcpServer;
pub use tools::{
    ActivityFilter, ActivityItem, ActivityKind, ActivityTimelineTools, CompanyContacts,
    LinkedOpportunity, OrphanReport, OrphanScanTools, PersonOpportunities, PipelineTools,
    RelationshipSummary, RelationshipTools, StageGroup, StageGroups, Timeline,
};

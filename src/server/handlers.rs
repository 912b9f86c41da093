//! MCP tool handlers for the CRM server.
//!
//! This module implements all the MCP tools using the rmcp SDK's tool_router
//! pattern. Handlers translate flat tool arguments into service calls and
//! render the structured results as JSON text.

use crate::repositories::{
    CommentRepository, CompanyRepository, NoteRepository, OpportunityRepository, PersonRepository,
    TaskRepository,
};
use crate::tools::{
    ActivityItem, ActivityTimelineTools, OrphanScanTools, PipelineTools, RelationshipTools,
    Timeline,
};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;

/// The CRM MCP server that exposes aggregation tools over the entity graph.
#[derive(Clone)]
pub struct CrmMcpServer {
    // Services provide business logic
    activity_service: Arc<dyn crate::services::ActivityService>,
    relationship_service: Arc<dyn crate::services::RelationshipService>,
    insight_service: Arc<dyn crate::services::InsightService>,
    tool_router: ToolRouter<Self>,
}

// Implement ServerHandler using the tool_handler macro
#[tool_handler]
impl ServerHandler for CrmMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "crm-mcp-server".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("MCP server for a CRM entity graph - provides merged activity timelines, relationship views and mutations, orphaned-record sweeps, and pipeline stage grouping.".into()),
        }
    }
}

// Helper structs for tool parameters
#[derive(Debug, Deserialize, JsonSchema)]
struct GetActivitiesParams {
    #[serde(default)]
    types: Option<Vec<String>>,
    #[serde(default)]
    date_from: Option<String>,
    #[serde(default)]
    date_to: Option<String>,
    #[serde(default)]
    author_id: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    offset: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct FilterActivitiesParams {
    #[serde(default)]
    types: Option<Vec<String>>,
    #[serde(default)]
    date_from: Option<String>,
    #[serde(default)]
    date_to: Option<String>,
    #[serde(default)]
    author_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct GetEntityActivitiesParams {
    entity_id: String,
    entity_type: String,
    #[serde(default)]
    include_comments: Option<bool>,
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    offset: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct CompanyIdParams {
    company_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct PersonIdParams {
    person_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct LinkOpportunityParams {
    opportunity_id: String,
    #[serde(default)]
    company_id: Option<String>,
    #[serde(default)]
    point_of_contact_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct TransferContactParams {
    contact_id: String,
    to_company_id: String,
    #[serde(default)]
    from_company_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RelationshipSummaryParams {
    entity_id: String,
    entity_type: String,
}

// Helper function to convert errors to MCP errors
fn to_mcp_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

/// Render one activity item for tool output.
fn activity_json(item: &ActivityItem) -> serde_json::Value {
    serde_json::json!({
        "type": item.kind.as_str(),
        "id": item.id,
        "title": item.title,
        "body": item.body,
        "status": item.status,
        "created_at": item.created_at,
        "author": item.author_id.as_ref().map(|id| serde_json::json!({
            "id": id,
            "name": item.author_name,
        })),
    })
}

/// Render a timeline for tool output.
fn timeline_json(timeline: &Timeline) -> serde_json::Value {
    serde_json::json!({
        "activities": timeline.activities.iter().map(activity_json).collect::<Vec<_>>(),
        "total_count": timeline.total_count,
        "has_more": timeline.has_more,
    })
}

// Tool router implementation
#[tool_router]
impl CrmMcpServer {
    /// Create a new CRM MCP server.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        person_repo: Arc<dyn PersonRepository>,
        company_repo: Arc<dyn CompanyRepository>,
        opportunity_repo: Arc<dyn OpportunityRepository>,
        task_repo: Arc<dyn TaskRepository>,
        note_repo: Arc<dyn NoteRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        page_size: usize,
        orphan_scan_limit: usize,
    ) -> Self {
        // Construct all tools with repository dependencies
        let timeline_tools = Arc::new(ActivityTimelineTools::new(
            task_repo.clone(),
            note_repo.clone(),
            comment_repo,
            page_size,
        ));

        let relationship_tools = Arc::new(RelationshipTools::new(
            person_repo.clone(),
            company_repo.clone(),
            opportunity_repo.clone(),
            task_repo.clone(),
            note_repo,
            page_size,
        ));

        let orphan_tools = Arc::new(OrphanScanTools::new(
            person_repo,
            company_repo,
            opportunity_repo.clone(),
            task_repo,
            page_size,
            orphan_scan_limit,
        ));

        let pipeline_tools = Arc::new(PipelineTools::new(opportunity_repo, page_size));

        // Construct services from tools
        let activity_service = Arc::new(crate::services::ActivityServiceImpl::new(timeline_tools))
            as Arc<dyn crate::services::ActivityService>;

        let relationship_service = Arc::new(crate::services::RelationshipServiceImpl::new(
            relationship_tools,
        )) as Arc<dyn crate::services::RelationshipService>;

        let insight_service = Arc::new(crate::services::InsightServiceImpl::new(
            orphan_tools,
            pipeline_tools,
        )) as Arc<dyn crate::services::InsightService>;

        Self {
            activity_service,
            relationship_service,
            insight_service,
            tool_router: Self::tool_router(),
        }
    }

    /// Get a merged activity feed across tasks and notes.
    #[tool(
        description = "Get a merged activity feed across tasks and notes, ordered by creation time (newest first) with a single pagination window over the merged sequence. Optionally filter by type, date range, or author."
    )]
    async fn get_activities(
        &self,
        params: Parameters<GetActivitiesParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        let timeline = self
            .activity_service
            .get_activities(
                params.types,
                params.date_from,
                params.date_to,
                params.author_id,
                params.limit,
                params.offset,
            )
            .await
            .map_err(to_mcp_error)?;

        let json_response = serde_json::to_string_pretty(&timeline_json(&timeline))
            .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }

    /// Filter activities, optionally narrowing tasks by status.
    #[tool(
        description = "Filter activities by type, date range, author, and task status. The status filter applies only to tasks; notes are excluded from a status-filtered result. Returns the full matched sequence."
    )]
    async fn filter_activities(
        &self,
        params: Parameters<FilterActivitiesParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        let activities = self
            .activity_service
            .filter_activities(
                params.types,
                params.date_from,
                params.date_to,
                params.author_id,
                params.status,
            )
            .await
            .map_err(to_mcp_error)?;

        let json_response = serde_json::to_string_pretty(&serde_json::json!({
            "activities": activities.iter().map(activity_json).collect::<Vec<_>>(),
            "count": activities.len(),
        }))
        .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }

    /// Get the activity timeline for one entity.
    #[tool(
        description = "Get the activity timeline for one entity (person, company, or opportunity), merging linked tasks and notes, optionally including comments."
    )]
    async fn get_entity_activities(
        &self,
        params: Parameters<GetEntityActivitiesParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        let timeline = self
            .activity_service
            .get_entity_activities(
                &params.entity_id,
                &params.entity_type,
                params.include_comments.unwrap_or(false),
                params.limit,
                params.offset,
            )
            .await
            .map_err(to_mcp_error)?;

        let json_response = serde_json::to_string_pretty(&timeline_json(&timeline))
            .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }

    /// List every contact at a company.
    #[tool(
        description = "List every contact whose company reference equals the given company, with the company name resolved."
    )]
    async fn get_company_contacts(
        &self,
        params: Parameters<CompanyIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        let contacts = self
            .relationship_service
            .get_company_contacts(&params.company_id)
            .await
            .map_err(to_mcp_error)?;

        let json_response = serde_json::to_string_pretty(&serde_json::json!({
            "company": {
                "id": contacts.company_id,
                "name": contacts.company_name,
            },
            "contacts": contacts.contacts.iter().map(|person| serde_json::json!({
                "id": person.id,
                "name": person.display_name(),
                "email": person.primary_email(),
                "job_title": person.job_title,
            })).collect::<Vec<_>>(),
            "total_count": contacts.total_count,
        }))
        .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }

    /// List every opportunity where a person is the point of contact.
    #[tool(
        description = "List every opportunity naming the given person as point of contact, each with its company name resolved when a company link exists."
    )]
    async fn get_person_opportunities(
        &self,
        params: Parameters<PersonIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        let opportunities = self
            .relationship_service
            .get_person_opportunities(&params.person_id)
            .await
            .map_err(to_mcp_error)?;

        let json_response = serde_json::to_string_pretty(&serde_json::json!({
            "person": {
                "id": opportunities.person_id,
                "name": opportunities.person_name,
            },
            "opportunities": opportunities.opportunities.iter().map(|entry| serde_json::json!({
                "id": entry.opportunity.id,
                "name": entry.opportunity.display_name(),
                "stage": entry.opportunity.stage,
                "value": entry.opportunity.value.as_ref().map(|v| v.to_string()),
                "company": entry.company_name,
            })).collect::<Vec<_>>(),
            "total_count": opportunities.total_count,
        }))
        .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }

    /// Link an opportunity to a company and/or point of contact.
    #[tool(
        description = "Link an opportunity to a company and/or a point of contact. At least one of company_id or point_of_contact_id is required; only the supplied relations are written."
    )]
    async fn link_opportunity_to_company(
        &self,
        params: Parameters<LinkOpportunityParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        tracing::info!("MCP Handler: link_opportunity_to_company called");

        let linked = self
            .relationship_service
            .link_opportunity_to_company(
                &params.opportunity_id,
                params.company_id,
                params.point_of_contact_id,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to link opportunity: {:?}", e);
                to_mcp_error(e)
            })?;

        let json_response = serde_json::to_string_pretty(&serde_json::json!({
            "opportunity": {
                "id": linked.opportunity.id,
                "name": linked.opportunity.display_name(),
                "company_id": linked.opportunity.company_id,
                "point_of_contact_id": linked.opportunity.point_of_contact_id,
            },
            "company_name": linked.company_name,
            "point_of_contact_name": linked.point_of_contact_name,
        }))
        .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }

    /// Reassign a contact to a different company.
    #[tool(
        description = "Reassign a contact to a different company. When from_company_id is supplied, the contact's current company must match it or the transfer fails without writing."
    )]
    async fn transfer_contact_to_company(
        &self,
        params: Parameters<TransferContactParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        tracing::info!("MCP Handler: transfer_contact_to_company called");

        let transferred = self
            .relationship_service
            .transfer_contact_to_company(
                &params.contact_id,
                &params.to_company_id,
                params.from_company_id,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to transfer contact: {:?}", e);
                to_mcp_error(e)
            })?;

        let json_response = serde_json::to_string_pretty(&serde_json::json!({
            "contact": {
                "id": transferred.person.id,
                "name": transferred.person.display_name(),
                "company_id": transferred.person.company_id,
            },
            "company_name": transferred.company_name,
        }))
        .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }

    /// Get per-relation-kind counts for an entity.
    #[tool(
        description = "Get counts of related companies, contacts, opportunities, tasks, and activities for a person, company, or opportunity."
    )]
    async fn get_relationship_summary(
        &self,
        params: Parameters<RelationshipSummaryParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;

        let summary = self
            .relationship_service
            .get_relationship_summary(&params.entity_id, &params.entity_type)
            .await
            .map_err(to_mcp_error)?;

        let json_response = serde_json::to_string_pretty(&serde_json::json!({
            "entity_id": summary.entity_id,
            "entity_type": summary.entity_type.as_str(),
            "companies": summary.companies,
            "contacts": summary.contacts,
            "opportunities": summary.opportunities,
            "tasks": summary.tasks,
            "activities": summary.activities,
        }))
        .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }

    /// Sweep the store for orphaned records.
    #[tool(
        description = "Sweep the store for records lacking an expected relationship: companies with no contacts, contacts with no company, opportunities missing both links, and unassigned tasks."
    )]
    async fn find_orphaned_records(&self) -> Result<CallToolResult, McpError> {
        let report = self
            .insight_service
            .find_orphaned_records()
            .await
            .map_err(to_mcp_error)?;

        let json_response = serde_json::to_string_pretty(&serde_json::json!({
            "companies_without_contacts": report.companies_without_contacts.iter().map(|c| {
                serde_json::json!({
                    "id": c.id,
                    "name": c.name,
                    "opportunity_count": c.opportunity_count,
                })
            }).collect::<Vec<_>>(),
            "contacts_without_companies": report.contacts_without_companies.iter().map(|c| {
                serde_json::json!({
                    "id": c.id,
                    "name": c.name,
                    "opportunity_count": c.opportunity_count,
                })
            }).collect::<Vec<_>>(),
            "unlinked_opportunities": report.unlinked_opportunities.iter().map(|o| {
                serde_json::json!({
                    "id": o.id,
                    "name": o.name,
                })
            }).collect::<Vec<_>>(),
            "unassigned_tasks": report.unassigned_tasks.iter().map(|t| {
                serde_json::json!({
                    "id": t.id,
                    "title": t.title,
                })
            }).collect::<Vec<_>>(),
            "total": report.total(),
        }))
        .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }

    /// Group all opportunities by sales stage.
    #[tool(
        description = "Group all opportunities by sales stage with per-stage counts and summed values. Opportunities without a stage group under 'No stage'."
    )]
    async fn list_opportunities_by_stage(&self) -> Result<CallToolResult, McpError> {
        let groups = self
            .insight_service
            .list_opportunities_by_stage()
            .await
            .map_err(to_mcp_error)?;

        let json_response = serde_json::to_string_pretty(&serde_json::json!({
            "stages": groups.stages.iter().map(|group| serde_json::json!({
                "stage": group.stage,
                "count": group.count,
                "total_value_micros": group.total_value_micros,
                "total_value": group.total_value_micros as f64 / 1_000_000.0,
                "opportunities": group.opportunities.iter().map(|o| serde_json::json!({
                    "id": o.id,
                    "name": o.display_name(),
                    "value": o.value.as_ref().map(|v| v.to_string()),
                })).collect::<Vec<_>>(),
            })).collect::<Vec<_>>(),
            "total_count": groups.total_count,
            "total_value_micros": groups.total_value_micros,
        }))
        .map_err(to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(json_response)]))
    }
}

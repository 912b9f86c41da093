//! CRM MCP Server - Main entry point
//!
//! This is the main executable for the CRM MCP Server, which provides a Model
//! Context Protocol (MCP) interface to a CRM entity graph.

use anyhow::Result;
use crm_mcp_server::client::{AsyncCrmClient, AsyncCrmClientImpl};
use crm_mcp_server::repositories::{
    CommentRepository, CompanyRepository, CrmCommentRepository, CrmCompanyRepository,
    CrmNoteRepository, CrmOpportunityRepository, CrmPersonRepository, CrmTaskRepository,
    NoteRepository, OpportunityRepository, PersonRepository, TaskRepository,
};
use crm_mcp_server::{Config, CrmClient, CrmMcpServer};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging (stderr only to avoid polluting stdout/MCP communication)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        "Starting CRM MCP Server with API URL: {}",
        config.crm_api_url
    );

    // Initialize CRM client
    let sync_client = CrmClient::new(&config);
    let client = Arc::new(AsyncCrmClientImpl::new(sync_client)) as Arc<dyn AsyncCrmClient>;

    // Initialize repositories
    let person_repo =
        Arc::new(CrmPersonRepository::new(client.clone())) as Arc<dyn PersonRepository>;
    let company_repo =
        Arc::new(CrmCompanyRepository::new(client.clone())) as Arc<dyn CompanyRepository>;
    let opportunity_repo =
        Arc::new(CrmOpportunityRepository::new(client.clone())) as Arc<dyn OpportunityRepository>;
    let task_repo = Arc::new(CrmTaskRepository::new(client.clone())) as Arc<dyn TaskRepository>;
    let note_repo = Arc::new(CrmNoteRepository::new(client.clone())) as Arc<dyn NoteRepository>;
    let comment_repo =
        Arc::new(CrmCommentRepository::new(client)) as Arc<dyn CommentRepository>;

    // Create the MCP server (tools are constructed internally)
    let server = CrmMcpServer::new(
        person_repo,
        company_repo,
        opportunity_repo,
        task_repo,
        note_repo,
        comment_repo,
        config.page_size,
        config.orphan_scan_limit,
    );

    info!("CRM MCP Server initialized");
    info!(
        "Page size: {}, orphan scan limit: {}",
        config.page_size, config.orphan_scan_limit
    );

    // Run the server (this will block until the server exits)
    info!("Starting MCP server with stdio transport");
    crm_mcp_server::server::run_server(server).await?;

    info!("CRM MCP Server shutdown complete");
    Ok(())
}

//! Insight service layer.
//!
//! Business logic for store-wide derived views: orphan sweeps and pipeline
//! stage grouping.

use crate::error::CrmApiResult;
use crate::tools::{OrphanReport, OrphanScanTools, PipelineTools, StageGroups};
use async_trait::async_trait;
use std::sync::Arc;

/// Insight service trait for business operations.
#[async_trait]
pub trait InsightService: Send + Sync {
    /// Sweep the store for records lacking an expected relationship.
    async fn find_orphaned_records(&self) -> CrmApiResult<OrphanReport>;

    /// Group all opportunities by sales stage.
    async fn list_opportunities_by_stage(&self) -> CrmApiResult<StageGroups>;
}

/// Default implementation of InsightService.
pub struct InsightServiceImpl {
    orphan_tools: Arc<OrphanScanTools>,
    pipeline_tools: Arc<PipelineTools>,
}

impl InsightServiceImpl {
    /// Create a new insight service.
    pub fn new(orphan_tools: Arc<OrphanScanTools>, pipeline_tools: Arc<PipelineTools>) -> Self {
        Self {
            orphan_tools,
            pipeline_tools,
        }
    }
}

#[async_trait]
impl InsightService for InsightServiceImpl {
    async fn find_orphaned_records(&self) -> CrmApiResult<OrphanReport> {
        self.orphan_tools.find_orphaned_records().await
    }

    async fn list_opportunities_by_stage(&self) -> CrmApiResult<StageGroups> {
        self.pipeline_tools.list_opportunities_by_stage().await
    }
}

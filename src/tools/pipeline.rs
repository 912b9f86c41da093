//! Pipeline-stage grouping.
//!
//! Buckets opportunities by sales stage and computes per-stage and total
//! monetary aggregates. All sums stay in integer micro-units; division by
//! 1,000,000 happens only when a caller renders a value.

use crate::error::CrmApiResult;
use crate::models::Opportunity;
use crate::repositories::{OpportunityFilter, OpportunityRepository};
use std::collections::HashMap;
use std::sync::Arc;

/// Stage label used for opportunities without a stage.
pub const NO_STAGE_LABEL: &str = "No stage";

/// One pipeline stage with its opportunities and aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct StageGroup {
    /// Stage name, or [`NO_STAGE_LABEL`] for unstaged opportunities
    pub stage: String,

    /// Opportunities in the stage, in fetch order
    pub opportunities: Vec<Opportunity>,

    /// Number of opportunities in the stage
    pub count: usize,

    /// Summed deal value in micro-units
    pub total_value_micros: i64,
}

/// All pipeline stages in first-seen order, with overall aggregates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StageGroups {
    /// Stages in the order their first opportunity was seen
    pub stages: Vec<StageGroup>,

    /// Total number of opportunities across all stages
    pub total_count: usize,

    /// Summed deal value across all stages, in micro-units
    pub total_value_micros: i64,
}

/// Pipeline grouping tools.
pub struct PipelineTools {
    opportunity_repo: Arc<dyn OpportunityRepository>,
    page_size: usize,
}

impl PipelineTools {
    /// Create new pipeline tools.
    pub fn new(opportunity_repo: Arc<dyn OpportunityRepository>, page_size: usize) -> Self {
        Self {
            opportunity_repo,
            page_size,
        }
    }

    /// Group all opportunities by sales stage.
    ///
    /// Stages appear in first-seen order, so the grouping is deterministic
    /// for a given input set. An absent stage groups under "No stage".
    pub async fn list_opportunities_by_stage(&self) -> CrmApiResult<StageGroups> {
        let opportunities = self.fetch_all_opportunities().await?;

        let mut stages: Vec<StageGroup> = Vec::new();
        let mut index_by_stage: HashMap<String, usize> = HashMap::new();
        let mut total_value_micros: i64 = 0;
        let total_count = opportunities.len();

        for opportunity in opportunities {
            let stage = opportunity
                .stage
                .clone()
                .unwrap_or_else(|| NO_STAGE_LABEL.to_string());
            let amount = opportunity.amount_micros();
            total_value_micros += amount;

            let index = *index_by_stage.entry(stage.clone()).or_insert_with(|| {
                stages.push(StageGroup {
                    stage,
                    opportunities: Vec::new(),
                    count: 0,
                    total_value_micros: 0,
                });
                stages.len() - 1
            });

            let group = &mut stages[index];
            group.opportunities.push(opportunity);
            group.count += 1;
            group.total_value_micros += amount;
        }

        Ok(StageGroups {
            stages,
            total_count,
            total_value_micros,
        })
    }

    /// Fetch all opportunities, handling pagination.
    async fn fetch_all_opportunities(&self) -> CrmApiResult<Vec<Opportunity>> {
        let filter = OpportunityFilter::default();
        let mut all = Vec::new();
        let mut offset = 0;

        loop {
            let page = self
                .opportunity_repo
                .search(&filter, self.page_size, offset)
                .await?;
            let count = page.items.len();
            all.extend(page.items);

            if count < self.page_size {
                break;
            }
            offset += self.page_size;
        }

        Ok(all)
    }
}

//! Activity service layer.
//!
//! Business logic for merged activity feeds and entity timelines.

use crate::error::{CrmApiError, CrmApiResult};
use crate::models::EntityType;
use crate::tools::{ActivityFilter, ActivityItem, ActivityKind, ActivityTimelineTools, Timeline};
use async_trait::async_trait;
use std::sync::Arc;

/// Activity service trait for business operations.
#[async_trait]
pub trait ActivityService: Send + Sync {
    /// Get a merged, paginated activity feed across tasks and notes.
    #[allow(clippy::too_many_arguments)]
    async fn get_activities(
        &self,
        types: Option<Vec<String>>,
        date_from: Option<String>,
        date_to: Option<String>,
        author_id: Option<String>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> CrmApiResult<Timeline>;

    /// Get the raw matched activity sequence, optionally narrowed by task
    /// status.
    async fn filter_activities(
        &self,
        types: Option<Vec<String>>,
        date_from: Option<String>,
        date_to: Option<String>,
        author_id: Option<String>,
        status: Option<String>,
    ) -> CrmApiResult<Vec<ActivityItem>>;

    /// Get a paginated activity feed scoped to one entity.
    async fn get_entity_activities(
        &self,
        entity_id: &str,
        entity_type: &str,
        include_comments: bool,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> CrmApiResult<Timeline>;
}

/// Default implementation of ActivityService.
pub struct ActivityServiceImpl {
    timeline_tools: Arc<ActivityTimelineTools>,
}

/// Validation helper functions.
impl ActivityServiceImpl {
    /// Validate entity ID format.
    fn validate_entity_id(entity_id: &str) -> Result<(), String> {
        if entity_id.trim().is_empty() {
            return Err("Entity ID cannot be empty".to_string());
        }
        if entity_id.len() > 100 {
            return Err("Entity ID too long".to_string());
        }
        Ok(())
    }

    /// Build an activity filter from flat tool arguments.
    fn build_filter(
        types: Option<Vec<String>>,
        date_from: Option<String>,
        date_to: Option<String>,
        author_id: Option<String>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> CrmApiResult<ActivityFilter> {
        let types = match types {
            Some(tokens) => Some(ActivityKind::parse_filter_tokens(&tokens)?),
            None => None,
        };
        let mut filter = ActivityFilter {
            types,
            date_from,
            date_to,
            author_id,
            ..Default::default()
        };
        if let Some(limit) = limit {
            filter.limit = limit;
        }
        if let Some(offset) = offset {
            filter.offset = offset;
        }
        Ok(filter)
    }
}

impl ActivityServiceImpl {
    /// Create a new activity service.
    pub fn new(timeline_tools: Arc<ActivityTimelineTools>) -> Self {
        Self { timeline_tools }
    }
}

#[async_trait]
impl ActivityService for ActivityServiceImpl {
    async fn get_activities(
        &self,
        types: Option<Vec<String>>,
        date_from: Option<String>,
        date_to: Option<String>,
        author_id: Option<String>,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> CrmApiResult<Timeline> {
        let filter = Self::build_filter(types, date_from, date_to, author_id, limit, offset)?;
        self.timeline_tools.get_activities(&filter).await
    }

    async fn filter_activities(
        &self,
        types: Option<Vec<String>>,
        date_from: Option<String>,
        date_to: Option<String>,
        author_id: Option<String>,
        status: Option<String>,
    ) -> CrmApiResult<Vec<ActivityItem>> {
        let filter = Self::build_filter(types, date_from, date_to, author_id, None, None)?;
        self.timeline_tools
            .filter_activities(&filter, status.as_deref())
            .await
    }

    async fn get_entity_activities(
        &self,
        entity_id: &str,
        entity_type: &str,
        include_comments: bool,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> CrmApiResult<Timeline> {
        Self::validate_entity_id(entity_id).map_err(CrmApiError::Validation)?;
        let entity_type: EntityType = entity_type.parse()?;

        self.timeline_tools
            .get_entity_activities(
                entity_id,
                entity_type,
                include_comments,
                limit.unwrap_or(crate::tools::DEFAULT_ACTIVITY_LIMIT),
                offset.unwrap_or(0),
            )
            .await
    }
}

//! Integration tests for pipeline-stage grouping.
//!
//! These tests validate stage bucketing, micro-unit value sums, the
//! "No stage" group, and deterministic first-seen ordering.

mod mocks;

use crm_mcp_server::models::{Money, Opportunity, MICROS_PER_UNIT};
use crm_mcp_server::tools::{PipelineTools, NO_STAGE_LABEL};
use mocks::MockOpportunityRepository;
use std::sync::Arc;

fn make_opportunity(id: &str, name: &str, stage: Option<&str>, amount_micros: Option<i64>) -> Opportunity {
    Opportunity {
        id: id.to_string(),
        name: Some(name.to_string()),
        stage: stage.map(String::from),
        value: amount_micros.map(|micros| Money::from_micros(micros, "USD")),
        ..Default::default()
    }
}

fn tools_with(repo: &Arc<MockOpportunityRepository>, page_size: usize) -> PipelineTools {
    PipelineTools::new(repo.clone(), page_size)
}

#[tokio::test]
async fn test_grouping_by_stage_with_value_sums() {
    let repo = Arc::new(MockOpportunityRepository::new());
    repo.add_opportunities(vec![
        make_opportunity("opp_1", "Deal A", Some("NEW"), Some(50_000_000)),
        make_opportunity("opp_2", "Deal B", Some("NEW"), Some(25_000_000)),
        make_opportunity("opp_3", "Deal C", None, None),
    ]);

    let groups = tools_with(&repo, 100).list_opportunities_by_stage().await.unwrap();

    assert_eq!(groups.total_count, 3);
    assert_eq!(groups.stages.len(), 2);

    let new_stage = groups.stages.iter().find(|g| g.stage == "NEW").unwrap();
    assert_eq!(new_stage.count, 2);
    assert_eq!(new_stage.total_value_micros, 75_000_000);

    let no_stage = groups
        .stages
        .iter()
        .find(|g| g.stage == NO_STAGE_LABEL)
        .unwrap();
    assert_eq!(no_stage.count, 1);
    assert_eq!(no_stage.total_value_micros, 0);
}

#[tokio::test]
async fn test_stages_appear_in_first_seen_order() {
    let repo = Arc::new(MockOpportunityRepository::new());
    // Fetch order is id order; the first opportunity has no stage
    repo.add_opportunities(vec![
        make_opportunity("opp_1", "Deal C", None, None),
        make_opportunity("opp_2", "Deal A", Some("NEW"), Some(10_000_000)),
        make_opportunity("opp_3", "Deal D", Some("NEGOTIATION"), Some(5_000_000)),
        make_opportunity("opp_4", "Deal B", Some("NEW"), Some(20_000_000)),
    ]);

    let tools = tools_with(&repo, 100);
    let first = tools.list_opportunities_by_stage().await.unwrap();
    let second = tools.list_opportunities_by_stage().await.unwrap();

    let order: Vec<&str> = first.stages.iter().map(|g| g.stage.as_str()).collect();
    assert_eq!(order, vec![NO_STAGE_LABEL, "NEW", "NEGOTIATION"]);

    // Deterministic for the same input set
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_micro_unit_sums_have_no_drift() {
    // One thousand 10-cent deals sum to exactly 100 whole units
    let repo = Arc::new(MockOpportunityRepository::new());
    for i in 0..1000 {
        repo.add_opportunity(make_opportunity(
            &format!("opp_{:04}", i),
            "Small deal",
            Some("NEW"),
            Some(Money::from_units(0.1, "USD").amount_micros),
        ));
    }

    let groups = tools_with(&repo, 100).list_opportunities_by_stage().await.unwrap();

    assert_eq!(groups.stages.len(), 1);
    assert_eq!(groups.stages[0].total_value_micros, 100 * MICROS_PER_UNIT);
    assert_eq!(groups.total_value_micros, 100 * MICROS_PER_UNIT);
}

#[tokio::test]
async fn test_grouping_pages_through_store() {
    // Page size 2 with five opportunities forces three fetches
    let repo = Arc::new(MockOpportunityRepository::new());
    for i in 1..=5 {
        repo.add_opportunity(make_opportunity(
            &format!("opp_{}", i),
            "Deal",
            Some("NEW"),
            Some(1_000_000),
        ));
    }

    let groups = tools_with(&repo, 2).list_opportunities_by_stage().await.unwrap();

    assert_eq!(groups.total_count, 5);
    assert_eq!(groups.stages[0].count, 5);
    assert_eq!(groups.stages[0].total_value_micros, 5_000_000);
}

#[tokio::test]
async fn test_empty_store_yields_no_stages() {
    let repo = Arc::new(MockOpportunityRepository::new());

    let groups = tools_with(&repo, 100).list_opportunities_by_stage().await.unwrap();

    assert!(groups.stages.is_empty());
    assert_eq!(groups.total_count, 0);
    assert_eq!(groups.total_value_micros, 0);
}

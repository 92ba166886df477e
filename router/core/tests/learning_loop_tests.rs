// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Integration tests for the feedback learning loop.
//!
//! Exercises reinforcement through the selector facade end to end: repeated
//! positive feedback must strictly raise future match confidence until the
//! weight cap, corrective feedback must shift weight toward the expected
//! agent, and learned state must survive a persist/restore cycle.

use std::sync::Arc;

use aegis_router_core::application::AgentSelector;
use aegis_router_core::domain::{
    AgentId, AgentProfile, AgentRegistry, AgentRole, Domain, FeedbackRecord,
};
use aegis_router_core::infrastructure::{JsonFileWeightRepository, PatternWeightStore};

fn fixture_registry() -> AgentRegistry {
    [
        AgentProfile::new(
            "testing-specialist",
            vec![
                "pytest".into(),
                "test".into(),
                "mock".into(),
                "async mock".into(),
                "fixture".into(),
                "coverage".into(),
            ],
            vec![Domain::Testing],
        ),
        AgentProfile::new(
            "security-specialist",
            vec!["security".into(), "audit".into(), "cve".into()],
            vec![Domain::Security],
        ),
        AgentProfile::new(
            "general-purpose",
            vec!["help".into()],
            vec![Domain::Documentation],
        )
        .with_role(AgentRole::GeneralPurpose),
    ]
    .into_iter()
    .collect()
}

fn selector() -> AgentSelector {
    AgentSelector::new(fixture_registry(), Arc::new(PatternWeightStore::new()))
}

const QUERY: &str = "pytest test failures with async mock configuration";

#[test]
fn test_feedback_loop_raises_confidence() {
    let selector = selector();

    let first = selector.select(QUERY);
    assert_eq!(first.result.agent, AgentId::new("testing-specialist"));
    assert!(!first.result.learning_applied);

    // Five selections, each confirmed correct.
    for _ in 0..5 {
        let response = selector.select(QUERY);
        let ack = selector.record_feedback(&FeedbackRecord::success(
            QUERY,
            response.result.agent.clone(),
            response.result.confidence,
        ));
        assert!(ack);
    }

    let sixth = selector.select(QUERY);
    assert_eq!(sixth.result.agent, AgentId::new("testing-specialist"));
    assert!(
        sixth.result.confidence > first.result.confidence,
        "confidence did not improve: {} vs {}",
        sixth.result.confidence,
        first.result.confidence
    );
    assert!(sixth.result.learning_applied);
    assert!(sixth.result.reasoning.contains("learned weights applied"));
}

#[test]
fn test_reinforcement_is_monotonic_until_cap() {
    let selector = selector();
    let record = FeedbackRecord::success(QUERY, AgentId::new("testing-specialist"), 0.8);

    let mut previous = selector.select(QUERY).result.confidence;
    let mut capped = false;
    for _ in 0..40 {
        selector.record_feedback(&record);
        let current = selector.select(QUERY).result.confidence;
        assert!(
            current >= previous,
            "reinforcement decreased confidence: {} -> {}",
            previous,
            current
        );
        if current == previous {
            capped = true;
        }
        previous = current;
    }
    // 40 rounds of +0.05 is past the cap; growth must have stopped.
    assert!(capped, "weights never saturated");
    assert!(previous <= 1.0);
}

#[test]
fn test_corrective_feedback_shifts_selection() {
    // Ambiguous query that both specialists partially match.
    let registry: AgentRegistry = [
        AgentProfile::new(
            "alpha-specialist",
            vec!["review".into(), "pipeline".into()],
            vec![Domain::Deployment],
        ),
        AgentProfile::new(
            "beta-specialist",
            vec!["review".into(), "audit".into()],
            vec![Domain::Security],
        ),
    ]
    .into_iter()
    .collect();
    let selector = AgentSelector::new(registry, Arc::new(PatternWeightStore::new()));

    let query = "review request";
    let initial = selector.select(query);
    assert_eq!(initial.result.agent, AgentId::new("alpha-specialist"));

    // Tell the router it should have picked beta, repeatedly.
    for _ in 0..5 {
        selector.record_feedback(&FeedbackRecord::failure(
            query,
            AgentId::new("alpha-specialist"),
            initial.result.confidence,
            Some(AgentId::new("beta-specialist")),
        ));
    }

    let corrected = selector.select(query);
    assert_eq!(corrected.result.agent, AgentId::new("beta-specialist"));
}

#[test]
fn test_feedback_for_unknown_agent_is_acknowledged() {
    let selector = selector();
    let before = selector.select(QUERY).result.confidence;

    let ack = selector.record_feedback(&FeedbackRecord::success(
        QUERY,
        AgentId::new("never-registered"),
        0.9,
    ));
    assert!(ack, "unknown-agent feedback must still acknowledge");
    assert_eq!(selector.select(QUERY).result.confidence, before);
}

#[test]
fn test_insights_report_learned_state() {
    let selector = selector();
    for _ in 0..3 {
        selector.record_feedback(&FeedbackRecord::success(
            QUERY,
            AgentId::new("testing-specialist"),
            0.8,
        ));
    }

    let insights = selector.insights(3);
    assert!(insights.total_patterns_tracked >= 4);
    assert!(insights.active_pattern_weights >= 4);
    // "async mock" is a learned phrase pattern.
    assert!(insights.context_patterns_learned >= 1);
    assert!(insights.domain_momentum[&Domain::Testing] > 0.0);
    assert_eq!(insights.top_performing_patterns.len(), 3);
    // Reported weights are clamped to [0, 1] even though storage runs higher.
    assert!((insights.top_performing_patterns[0].1 - 1.0).abs() < 1e-12);
    assert!(insights.top_performing_patterns.iter().all(|(_, w)| *w <= 1.0));
}

#[tokio::test]
async fn test_learning_survives_persist_restore() {
    let dir = tempfile::tempdir().unwrap();
    let repository = JsonFileWeightRepository::new(dir.path().join("weights.json"));

    let original = selector();
    let baseline = original.select(QUERY).result.confidence;
    for _ in 0..5 {
        original.record_feedback(&FeedbackRecord::success(
            QUERY,
            AgentId::new("testing-specialist"),
            0.8,
        ));
    }
    let trained = original.select(QUERY).result.confidence;
    assert!(trained > baseline);
    assert!(original.persist_learning(&repository).await);

    // Fresh process: restore merges the persisted document.
    let restored = selector();
    assert!(restored.restore_learning(&repository).await);
    let after_restore = restored.select(QUERY).result.confidence;
    assert_eq!(after_restore, trained);
}

#[tokio::test]
async fn test_persistence_failure_is_non_fatal() {
    let selector = selector();
    selector.record_feedback(&FeedbackRecord::success(
        QUERY,
        AgentId::new("testing-specialist"),
        0.8,
    ));

    // A directory path cannot be atomically replaced by a file.
    let dir = tempfile::tempdir().unwrap();
    let repository = JsonFileWeightRepository::new(dir.path());
    assert!(!selector.persist_learning(&repository).await);

    // In-memory learning stays authoritative.
    assert!(selector.select(QUERY).result.learning_applied);
}

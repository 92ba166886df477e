// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Capability Matcher
//!
//! Pure scoring of a query against every registered agent profile. The raw
//! confidence for an agent combines three factors with fixed coefficients:
//!
//! - weighted keyword overlap: fraction of the agent's capability keywords
//!   present in the query, each occurrence multiplied by its learned weight
//!   (default 1.0 if never learned) — coefficient [`KEYWORD_OVERLAP_COEFF`];
//! - match saturation: how many keywords matched at all, saturating at
//!   [`MATCH_SATURATION_AT`] — coefficient [`MATCH_SATURATION_COEFF`];
//! - a flat coordination-language bonus for coordination-capable agents when
//!   the query carries explicit coordination cues — [`COORDINATION_BONUS`].
//!
//! The coefficients are tuned defaults, not contractual values. No side
//! effects: the matcher is a pure function of the query, the registry and
//! one weight-table snapshot.

use std::collections::BTreeMap;

use crate::domain::{AgentId, AgentProfile, AgentRegistry, AgentRole, Query};
use crate::infrastructure::WeightTable;

use super::boundary_detector::DomainBoundaryDetector;

/// Weight of the learned keyword-overlap fraction.
pub const KEYWORD_OVERLAP_COEFF: f64 = 0.7;
/// Weight of the absolute-match-count saturation term.
pub const MATCH_SATURATION_COEFF: f64 = 0.3;
/// Matched-keyword count at which the saturation term maxes out.
pub const MATCH_SATURATION_AT: f64 = 4.0;
/// Flat bonus for coordination-capable agents on coordination language.
pub const COORDINATION_BONUS: f64 = 0.15;

/// Raw matcher output for one agent.
#[derive(Debug, Clone)]
pub struct RawScore {
    /// Clamped to [0.0, 1.0]; 0.0 when nothing overlapped.
    pub confidence: f64,
    /// Keywords from the agent's profile found in the query.
    pub matched: Vec<String>,
    /// True when a learned (non-default) weight influenced this score.
    pub learning_applied: bool,
}

impl RawScore {
    fn zero() -> Self {
        Self {
            confidence: 0.0,
            matched: Vec::new(),
            learning_applied: false,
        }
    }
}

pub struct CapabilityMatcher;

impl CapabilityMatcher {
    /// Score every registered agent. Agents with no keyword overlap get an
    /// explicit zero entry, never a missing one.
    pub fn score(
        query: &Query,
        registry: &AgentRegistry,
        weights: &WeightTable,
    ) -> BTreeMap<AgentId, RawScore> {
        let coordination_language = DomainBoundaryDetector::has_coordination_language(query);
        registry
            .iter()
            .map(|profile| {
                (
                    profile.id.clone(),
                    Self::score_agent(query, profile, weights, coordination_language),
                )
            })
            .collect()
    }

    fn score_agent(
        query: &Query,
        profile: &AgentProfile,
        weights: &WeightTable,
        coordination_language: bool,
    ) -> RawScore {
        if profile.keywords.is_empty() || query.is_empty() {
            return RawScore::zero();
        }

        let matched: Vec<String> = profile
            .keywords
            .iter()
            .filter(|k| query.contains_pattern(k))
            .cloned()
            .collect();
        if matched.is_empty() {
            return RawScore::zero();
        }

        let weighted_hits: f64 = matched
            .iter()
            .map(|k| weights.weight_for(k, &profile.domains))
            .sum();
        let overlap = weighted_hits / profile.keywords.len() as f64;
        let saturation = (matched.len() as f64 / MATCH_SATURATION_AT).min(1.0);

        let mut confidence =
            KEYWORD_OVERLAP_COEFF * overlap + MATCH_SATURATION_COEFF * saturation;

        let coordination_capable = matches!(
            profile.role,
            AgentRole::Coordinator | AgentRole::StrategicCoordinator
        );
        if coordination_language && coordination_capable {
            confidence += COORDINATION_BONUS;
        }

        let learning_applied = matched
            .iter()
            .any(|k| weights.has_learned(k, &profile.domains));

        RawScore {
            confidence: confidence.clamp(0.0, 1.0),
            matched,
            learning_applied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Domain, PatternKey};
    use crate::infrastructure::PatternWeightStore;

    fn registry() -> AgentRegistry {
        [
            AgentProfile::new(
                "testing-specialist",
                vec![
                    "pytest".into(),
                    "test".into(),
                    "mock".into(),
                    "fixture".into(),
                ],
                vec![Domain::Testing],
            ),
            AgentProfile::new(
                "security-specialist",
                vec!["security".into(), "vulnerability".into(), "audit".into()],
                vec![Domain::Security],
            ),
            AgentProfile::new(
                "multi-coordinator",
                vec!["coordinate".into(), "orchestrate".into()],
                vec![Domain::Infrastructure],
            )
            .with_role(AgentRole::Coordinator),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_every_agent_gets_an_entry() {
        let store = PatternWeightStore::new();
        let scores = CapabilityMatcher::score(
            &Query::parse("pytest mock"),
            &registry(),
            &store.snapshot(),
        );
        assert_eq!(scores.len(), 3);
        assert_eq!(scores[&AgentId::new("security-specialist")].confidence, 0.0);
    }

    #[test]
    fn test_overlap_drives_confidence() {
        let store = PatternWeightStore::new();
        let scores = CapabilityMatcher::score(
            &Query::parse("pytest test mock fixture"),
            &registry(),
            &store.snapshot(),
        );
        let full = &scores[&AgentId::new("testing-specialist")];
        assert_eq!(full.matched.len(), 4);
        assert!(full.confidence > 0.9);

        let partial = CapabilityMatcher::score(
            &Query::parse("pytest only"),
            &registry(),
            &store.snapshot(),
        );
        assert!(
            partial[&AgentId::new("testing-specialist")].confidence < full.confidence
        );
    }

    #[test]
    fn test_learned_weight_raises_confidence() {
        let store = PatternWeightStore::new();
        let query = Query::parse("pytest mock");
        let before = CapabilityMatcher::score(&query, &registry(), &store.snapshot())
            [&AgentId::new("testing-specialist")]
            .confidence;

        store.update(|table| {
            for _ in 0..5 {
                table
                    .entry(PatternKey::new("pytest", Domain::Testing))
                    .reinforce();
            }
        });

        let after = &CapabilityMatcher::score(&query, &registry(), &store.snapshot())
            [&AgentId::new("testing-specialist")];
        assert!(after.confidence > before);
        assert!(after.learning_applied);
    }

    #[test]
    fn test_coordination_bonus_only_for_coordinators() {
        let store = PatternWeightStore::new();
        let query = Query::parse("coordinate the pytest work");
        let scores = CapabilityMatcher::score(&query, &registry(), &store.snapshot());

        let coordinator = &scores[&AgentId::new("multi-coordinator")];
        // 1 of 2 keywords matched plus the coordination bonus.
        let expected = KEYWORD_OVERLAP_COEFF * 0.5
            + MATCH_SATURATION_COEFF * 0.25
            + COORDINATION_BONUS;
        assert!((coordinator.confidence - expected).abs() < 1e-9);

        // Specialists never receive the bonus.
        let specialist = &scores[&AgentId::new("testing-specialist")];
        let no_bonus = KEYWORD_OVERLAP_COEFF * 0.25 + MATCH_SATURATION_COEFF * 0.25;
        assert!((specialist.confidence - no_bonus).abs() < 1e-9);
    }

    #[test]
    fn test_empty_query_scores_zero_everywhere() {
        let store = PatternWeightStore::new();
        let scores =
            CapabilityMatcher::score(&Query::parse(""), &registry(), &store.snapshot());
        assert!(scores.values().all(|s| s.confidence == 0.0));
    }
}

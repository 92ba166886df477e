// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Selector Orchestrator
//!
//! Facade over the selection pipeline. Each call walks the fixed phase
//! sequence `Idle → Scoring → BoundaryCheck → ConflictCheck → Ranking →
//! Done` synchronously and always terminates in `Done` with a valid
//! [`MatchResult`]: degraded inputs (empty query, empty registry, garbage)
//! resolve to the designated general-purpose agent with explicit low
//! confidence rather than an error. The only shared state touched is one
//! weight-store snapshot taken at `Scoring`, so feedback arriving mid-call
//! never affects the call's outcome.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::domain::{
    AgentId, AgentRegistry, Conflict, DomainBoundary, DomainSpan, FeedbackRecord, MatchResult,
    Query, RouterError, SelectionResponse, Suggestion,
};
use crate::infrastructure::{PatternWeightStore, WeightTable, WeightStoreRepository};

use super::boundary_detector::DomainBoundaryDetector;
use super::conflict_resolver::ConflictResolver;
use super::learning_engine::{LearningEngine, LearningInsights};
use super::matcher::{CapabilityMatcher, RawScore};

/// Suggestions returned when the caller does not ask for a specific count.
pub const DEFAULT_SUGGESTIONS: usize = 5;

/// Confidence reported for fallback selections. Low and explicit: the caller
/// can see the router had nothing better.
const FALLBACK_CONFIDENCE: f64 = 0.05;

/// Pipeline phases, in execution order. Logged per transition; there is no
/// retry loop and no suspension point between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Scoring,
    BoundaryCheck,
    ConflictCheck,
    Ranking,
    Done,
}

struct Candidate {
    agent: AgentId,
    confidence: f64,
    momentum: f64,
    score: RawScore,
}

pub struct AgentSelector {
    registry: AgentRegistry,
    store: Arc<PatternWeightStore>,
    learning: LearningEngine,
}

impl AgentSelector {
    pub fn new(registry: AgentRegistry, store: Arc<PatternWeightStore>) -> Self {
        let learning = LearningEngine::new(store.clone());
        Self {
            registry,
            store,
            learning,
        }
    }

    /// Select with the default suggestion count.
    pub fn select(&self, raw_query: &str) -> SelectionResponse {
        self.select_top_n(raw_query, DEFAULT_SUGGESTIONS)
    }

    /// Run the full pipeline. Never fails; see the module docs for the
    /// degraded paths.
    pub fn select_top_n(&self, raw_query: &str, top_n: usize) -> SelectionResponse {
        let started = Instant::now();

        // Idle: validate input. An empty string is a query with zero matched
        // tokens, not an error.
        debug!(phase = ?Phase::Idle, query = raw_query, "selection started");
        let query = Query::parse(raw_query);

        if self.registry.is_empty() {
            warn!(error = %RouterError::RegistryUnavailable, "selecting fallback agent");
            return self.fallback_response(
                started,
                0.0,
                "no agents registered; routed to the general-purpose fallback",
            );
        }

        // Scoring: one weight snapshot serves the whole call.
        debug!(phase = ?Phase::Scoring, "scoring all registered agents");
        let weights = self.store.snapshot();
        let scores = CapabilityMatcher::score(&query, &self.registry, &weights);

        // BoundaryCheck.
        debug!(phase = ?Phase::BoundaryCheck, "detecting domain boundary");
        let boundary = DomainBoundaryDetector::detect(&query);

        // ConflictCheck: only a multi-domain boundary can carry conflicts.
        debug!(phase = ?Phase::ConflictCheck, "resolving domain conflicts");
        let conflicts = boundary
            .as_ref()
            .map(ConflictResolver::resolve)
            .unwrap_or_default();

        // Ranking.
        debug!(phase = ?Phase::Ranking, "ranking candidates");
        let mut candidates = self.rank(scores, &weights);
        let overridden = self.apply_boundary_override(&mut candidates, boundary.as_ref());

        let response = self.finish(
            started,
            &query,
            candidates,
            boundary.as_ref(),
            &conflicts,
            overridden,
            top_n,
        );
        debug!(
            phase = ?Phase::Done,
            agent = %response.result.agent,
            confidence = response.result.confidence,
            "selection finished"
        );
        response
    }

    /// Sort by confidence descending; ties break on higher domain momentum,
    /// then lexicographic agent id. The map input guarantees unique ids.
    fn rank(
        &self,
        scores: std::collections::BTreeMap<AgentId, RawScore>,
        weights: &WeightTable,
    ) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = scores
            .into_iter()
            .map(|(agent, score)| {
                let momentum = self
                    .registry
                    .get(&agent)
                    .map(|p| weights.momentum_for(&p.domains))
                    .unwrap_or(0.0);
                Candidate {
                    agent,
                    confidence: score.confidence,
                    momentum,
                    score,
                }
            })
            .collect();
        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(
                    b.momentum
                        .partial_cmp(&a.momentum)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
                .then(a.agent.cmp(&b.agent))
        });
        candidates
    }

    /// Multi-domain and strategic boundaries route to the designated
    /// coordination agent regardless of raw score; the raw ranking stays
    /// behind it as secondary suggestions. Returns true when an override
    /// happened.
    fn apply_boundary_override(
        &self,
        candidates: &mut Vec<Candidate>,
        boundary: Option<&DomainBoundary>,
    ) -> bool {
        let Some(boundary) = boundary else {
            return false;
        };
        let coordinator = match boundary.span {
            DomainSpan::Single => return false,
            DomainSpan::Multi => self.registry.coordinator(),
            DomainSpan::Strategic => self.registry.strategic_coordinator(),
        };
        let Some(coordinator) = coordinator else {
            warn!(span = ?boundary.span, "no coordination agent registered; keeping raw ranking");
            return false;
        };

        let position = candidates.iter().position(|c| c.agent == coordinator.id);
        let mut candidate = match position {
            Some(i) => candidates.remove(i),
            None => Candidate {
                agent: coordinator.id.clone(),
                confidence: 0.0,
                momentum: 0.0,
                score: RawScore {
                    confidence: 0.0,
                    matched: Vec::new(),
                    learning_applied: false,
                },
            },
        };
        // The boundary's confidence backs the routing decision even when the
        // coordinator's own keyword overlap is weak; it also must outrank the
        // best raw candidate so the suggestion ordering invariant holds.
        let top_raw = candidates.first().map(|c| c.confidence).unwrap_or(0.0);
        candidate.confidence = candidate
            .confidence
            .max(boundary.confidence)
            .max(top_raw)
            .clamp(0.0, 1.0);
        candidates.insert(0, candidate);
        true
    }

    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        started: Instant,
        query: &Query,
        candidates: Vec<Candidate>,
        boundary: Option<&DomainBoundary>,
        conflicts: &[Conflict],
        overridden: bool,
        top_n: usize,
    ) -> SelectionResponse {
        // First candidate with signal that also clears its own profile
        // threshold; an agent below its min_confidence stays a suggestion
        // but is never selected top-1.
        let selected = candidates.iter().find(|c| {
            c.confidence > 0.0
                && self
                    .registry
                    .get(&c.agent)
                    .and_then(|p| p.min_confidence)
                    .map_or(true, |min| c.confidence >= min)
        });

        let Some(selected) = selected else {
            let reason = if query.is_empty() {
                "empty query; routed to the general-purpose fallback"
            } else {
                debug!(
                    error = %RouterError::InvalidInput(query.raw().to_string()),
                    "no scoring signal; degrading to fallback"
                );
                "no agent profile overlapped the query; routed to the general-purpose fallback"
            };
            return self.fallback_response(started, FALLBACK_CONFIDENCE, reason);
        };
        let learning_applied = candidates.iter().any(|c| c.score.learning_applied);

        // The coordinator sits at index 0 when an override happened; if its
        // own threshold pushed selection past it, the coordination reasoning
        // no longer describes the selected agent.
        let coordinator_selected = overridden
            && candidates
                .first()
                .is_some_and(|c| c.agent == selected.agent);
        let mut reasoning = if let Some(boundary) = boundary.filter(|_| coordinator_selected) {
            format!(
                "query spans {} plus {} secondary domain(s); routed to coordination agent (boundary confidence {:.2})",
                boundary.primary,
                boundary.secondary.len(),
                boundary.confidence
            )
        } else {
            format!(
                "matched {} capability pattern(s): {}",
                selected.score.matched.len(),
                selected.score.matched.join(", ")
            )
        };
        if learning_applied {
            reasoning.push_str("; learned weights applied");
        }
        for conflict in conflicts {
            reasoning.push_str("; ");
            reasoning.push_str(&conflict.summary());
        }

        let suggestions: Vec<Suggestion> = candidates
            .iter()
            .take(top_n.max(1))
            .map(|c| Suggestion {
                agent: c.agent.clone(),
                confidence: c.confidence.clamp(0.0, 1.0),
            })
            .collect();

        SelectionResponse {
            result: MatchResult {
                agent: selected.agent.clone(),
                confidence: selected.confidence.clamp(0.0, 1.0),
                reasoning,
                elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
                learning_applied,
                fallback_used: false,
            },
            suggestions,
        }
    }

    fn fallback_response(
        &self,
        started: Instant,
        confidence: f64,
        reasoning: &str,
    ) -> SelectionResponse {
        let agent = self.registry.fallback_agent();
        SelectionResponse {
            result: MatchResult {
                agent: agent.clone(),
                confidence: confidence.clamp(0.0, 1.0),
                reasoning: reasoning.to_string(),
                elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
                learning_applied: false,
                fallback_used: true,
            },
            suggestions: vec![Suggestion {
                agent,
                confidence: confidence.clamp(0.0, 1.0),
            }],
        }
    }

    /// Feedback entry point. Serialized internally by the weight store's
    /// writer lock; always acknowledges.
    pub fn record_feedback(&self, record: &FeedbackRecord) -> bool {
        self.learning.record_feedback(record, &self.registry)
    }

    pub fn insights(&self, top_n: usize) -> LearningInsights {
        self.learning.insights(top_n)
    }

    /// Best-effort persistence; failure is non-fatal.
    pub async fn persist_learning(&self, repository: &dyn WeightStoreRepository) -> bool {
        self.learning.persist(repository).await
    }

    /// Merge persisted learning into the live store at startup.
    pub async fn restore_learning(&self, repository: &dyn WeightStoreRepository) -> bool {
        self.learning.restore(repository).await
    }
}

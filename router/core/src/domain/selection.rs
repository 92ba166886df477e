// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};

use super::agent::AgentId;

/// One ranked candidate in a selection response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub agent: AgentId,
    /// Clamped to [0.0, 1.0].
    pub confidence: f64,
}

/// Outcome of one selection call.
///
/// Exactly one result is designated selected per call; the suggestion list
/// is ordered by descending confidence with ties broken by domain momentum
/// and then lexicographic agent id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub agent: AgentId,
    /// Clamped to [0.0, 1.0].
    pub confidence: f64,
    pub reasoning: String,
    pub elapsed_ms: f64,
    /// True when at least one learned (non-default) weight influenced scoring.
    pub learning_applied: bool,
    /// True when the selection degraded to the general-purpose fallback.
    pub fallback_used: bool,
}

/// Full response: the selected result plus up to N further suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionResponse {
    pub result: MatchResult,
    pub suggestions: Vec<Suggestion>,
}

// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};

use super::agent::Domain;

/// How many specialist domains a query spans, and therefore where it routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainSpan {
    /// One domain; route to the best-scoring specialist.
    Single,
    /// 2-4 domains; route to the designated coordination agent.
    Multi,
    /// 5+ domains or explicit strategic language; route to the top-level
    /// coordination agent regardless of confidence.
    Strategic,
}

/// Detected domain span of one query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainBoundary {
    pub primary: Domain,
    /// Secondary domains ordered by descending keyword frequency,
    /// ties broken by domain order for determinism.
    pub secondary: Vec<Domain>,
    /// Share of domain-tagged keywords belonging to the primary domain,
    /// reduced per secondary domain and raised per coordination cue.
    pub confidence: f64,
    /// Grows with detected domain count and overlap-indicator count.
    pub complexity: f64,
    /// Cue phrases that indicated multi-domain coordination.
    pub overlap_indicators: Vec<String>,
    pub span: DomainSpan,
}

impl DomainBoundary {
    /// All domains the boundary covers, primary first.
    pub fn domains(&self) -> Vec<Domain> {
        let mut all = Vec::with_capacity(1 + self.secondary.len());
        all.push(self.primary);
        all.extend(self.secondary.iter().copied());
        all
    }

    /// A boundary with no secondary domains carries no multi-domain signal
    /// and must never trigger conflict resolution.
    pub fn is_multi_domain(&self) -> bool {
        !self.secondary.is_empty()
    }
}

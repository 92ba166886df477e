// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};

use super::agent::Domain;

/// Known tensions between capability domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictKind {
    SecurityPerformance,
    StabilityConvenience,
    TestingDeploymentSpeed,
    Other,
}

impl ConflictKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictKind::SecurityPerformance => "security-performance",
            ConflictKind::StabilityConvenience => "stability-convenience",
            ConflictKind::TestingDeploymentSpeed => "testing-deployment-speed",
            ConflictKind::Other => "other",
        }
    }
}

/// Priority class of a resolution strategy.
///
/// The derived `Ord` encodes the fixed resolution priority
/// Security > Stability > Performance > Convenience: lower discriminants
/// sort first, so sorting strategies by category always places the
/// security-preserving action at the head of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyCategory {
    Security,
    Stability,
    Performance,
    Convenience,
}

/// One recommended mitigation for a domain conflict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionStrategy {
    pub category: StrategyCategory,
    pub action: String,
}

impl ResolutionStrategy {
    pub fn new(category: StrategyCategory, action: impl Into<String>) -> Self {
        Self {
            category,
            action: action.into(),
        }
    }
}

/// A detected tension between two domains of a multi-domain boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    /// 0.0-1.0, derived from the pair's base tension and the boundary's
    /// complexity score.
    pub severity: f64,
    pub domains: (Domain, Domain),
    /// Ordered by `StrategyCategory` priority, highest first.
    pub strategies: Vec<ResolutionStrategy>,
}

impl Conflict {
    /// One-line form used in selection reasoning strings.
    pub fn summary(&self) -> String {
        let lead = self
            .strategies
            .first()
            .map(|s| s.action.as_str())
            .unwrap_or("no strategy available");
        format!(
            "{} tension between {} and {} (severity {:.2}); prefer: {}",
            self.kind.as_str(),
            self.domains.0,
            self.domains.1,
            self.severity,
            lead
        )
    }
}

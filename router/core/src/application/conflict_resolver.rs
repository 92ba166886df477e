// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Conflict Resolver
//!
//! Detects known tensions between the domains of a multi-domain boundary
//! and attaches ranked mitigation strategies. Tension pairs and their base
//! weights are a fixed table; strategy ordering follows the fixed priority
//! Security > Stability > Performance > Convenience.

use once_cell::sync::Lazy;

use crate::domain::{
    Conflict, ConflictKind, Domain, DomainBoundary, ResolutionStrategy, StrategyCategory,
};

struct TensionPair {
    domains: (Domain, Domain),
    kind: ConflictKind,
    /// Base severity before the boundary's complexity factor is applied.
    base_tension: f64,
}

static TENSION_PAIRS: Lazy<Vec<TensionPair>> = Lazy::new(|| {
    vec![
        TensionPair {
            domains: (Domain::Security, Domain::Performance),
            kind: ConflictKind::SecurityPerformance,
            base_tension: 0.8,
        },
        TensionPair {
            domains: (Domain::Stability, Domain::Convenience),
            kind: ConflictKind::StabilityConvenience,
            base_tension: 0.6,
        },
        TensionPair {
            domains: (Domain::Testing, Domain::Deployment),
            kind: ConflictKind::TestingDeploymentSpeed,
            base_tension: 0.5,
        },
        TensionPair {
            domains: (Domain::Documentation, Domain::Testing),
            kind: ConflictKind::Other,
            base_tension: 0.3,
        },
    ]
});

pub struct ConflictResolver;

impl ConflictResolver {
    /// Pure: emits one [`Conflict`] per known tension pair present in the
    /// boundary. A boundary without secondary domains yields nothing.
    pub fn resolve(boundary: &DomainBoundary) -> Vec<Conflict> {
        if !boundary.is_multi_domain() {
            return Vec::new();
        }

        let domains = boundary.domains();
        let mut conflicts = Vec::new();
        for (i, &a) in domains.iter().enumerate() {
            for &b in &domains[i + 1..] {
                if let Some(pair) = Self::lookup(a, b) {
                    conflicts.push(Conflict {
                        kind: pair.kind,
                        severity: Self::severity(pair.base_tension, boundary.complexity),
                        domains: pair.domains,
                        strategies: Self::strategies(pair.kind),
                    });
                }
            }
        }
        conflicts
    }

    fn lookup(a: Domain, b: Domain) -> Option<&'static TensionPair> {
        TENSION_PAIRS
            .iter()
            .find(|p| p.domains == (a, b) || p.domains == (b, a))
    }

    /// Base tension scaled by boundary complexity: a tangled boundary makes
    /// every tension harder to mitigate.
    fn severity(base_tension: f64, complexity: f64) -> f64 {
        (base_tension * (0.5 + 0.5 * complexity)).clamp(0.0, 1.0)
    }

    fn strategies(kind: ConflictKind) -> Vec<ResolutionStrategy> {
        let mut strategies = match kind {
            ConflictKind::SecurityPerformance => vec![
                ResolutionStrategy::new(
                    StrategyCategory::Security,
                    "keep security controls intact and optimize within them",
                ),
                ResolutionStrategy::new(
                    StrategyCategory::Performance,
                    "profile hot paths once hardening is in place",
                ),
                ResolutionStrategy::new(
                    StrategyCategory::Convenience,
                    "cache validated results where policy allows",
                ),
            ],
            ConflictKind::StabilityConvenience => vec![
                ResolutionStrategy::new(
                    StrategyCategory::Stability,
                    "ship behind a flag with a rollback path",
                ),
                ResolutionStrategy::new(
                    StrategyCategory::Convenience,
                    "streamline the workflow after the flag proves stable",
                ),
            ],
            ConflictKind::TestingDeploymentSpeed => vec![
                ResolutionStrategy::new(
                    StrategyCategory::Stability,
                    "gate the release on the critical-path test suite",
                ),
                ResolutionStrategy::new(
                    StrategyCategory::Performance,
                    "parallelize the remaining suites in the pipeline",
                ),
            ],
            ConflictKind::Other => vec![
                ResolutionStrategy::new(
                    StrategyCategory::Stability,
                    "settle the owning domain before splitting the work",
                ),
                ResolutionStrategy::new(
                    StrategyCategory::Convenience,
                    "time-box the lower-priority side",
                ),
            ],
        };
        // Fixed priority order; the derived Ord on StrategyCategory puts the
        // security-preserving action first whenever one exists.
        strategies.sort_by_key(|s| s.category);
        strategies
    }
}

// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Learning Engine
//!
//! Consumes feedback records and mutates the pattern weight store: bounded
//! reinforcement on success, bounded penalty plus corrective reinforcement
//! on failure, and a per-domain momentum EMA used downstream as a ranking
//! tie-break. All mutation for one record lands as a single copy-on-write
//! publish, so concurrent selections observe either none or all of it.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{
    AgentProfile, AgentRegistry, Domain, FeedbackRecord, PatternKey, Query, RouterError,
    MOMENTUM_DECAY,
};
use crate::infrastructure::{PatternWeightStore, WeightStoreRepository, WeightTable};

/// Read-only aggregates over the learned state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningInsights {
    pub total_patterns_tracked: usize,
    /// Patterns whose weight has moved off the default.
    pub active_pattern_weights: usize,
    /// Multi-word (contextual phrase) patterns among the tracked set.
    pub context_patterns_learned: usize,
    pub domain_momentum: BTreeMap<Domain, f64>,
    /// Top patterns by stored weight, strongest first.
    pub top_performing_patterns: Vec<(String, f64)>,
}

pub struct LearningEngine {
    store: Arc<PatternWeightStore>,
}

impl LearningEngine {
    pub fn new(store: Arc<PatternWeightStore>) -> Self {
        Self { store }
    }

    /// Apply one feedback record. Always acknowledges: feedback referencing
    /// an unknown agent is a warn-logged no-op rather than an error, so
    /// callers never have to branch on the result.
    pub fn record_feedback(&self, record: &FeedbackRecord, registry: &AgentRegistry) -> bool {
        let Some(selected) = registry.get(&record.selected) else {
            warn!(
                error = %RouterError::LearningUpdateRejected(record.selected.clone()),
                "recording feedback as no-op"
            );
            return true;
        };

        let query = Query::parse(&record.query);
        let contributing = Self::contributing_patterns(&query, selected);
        let expected = record
            .expected
            .as_ref()
            .and_then(|id| registry.get(id))
            .filter(|p| p.id != selected.id);

        let selected = selected.clone();
        let expected = expected.cloned();
        let success = record.success;

        self.store.update(|table| {
            if success {
                for pattern in &contributing {
                    for &domain in &selected.domains {
                        table
                            .entry(PatternKey::new(pattern.as_str(), domain))
                            .reinforce();
                    }
                }
                for &domain in &selected.domains {
                    Self::bump_momentum(table, domain, 1.0);
                }
            } else {
                // The matched patterns led the wrong way; dampen them.
                for pattern in &contributing {
                    for &domain in &selected.domains {
                        table
                            .entry(PatternKey::new(pattern.as_str(), domain))
                            .penalize();
                    }
                }
                for &domain in &selected.domains {
                    Self::bump_momentum(table, domain, 0.0);
                }
                // Corrective reinforcement: patterns of the agent that should
                // have won, where they were present in the query.
                if let Some(expected) = &expected {
                    for pattern in Self::contributing_patterns(&query, expected) {
                        for &domain in &expected.domains {
                            table
                                .entry(PatternKey::new(pattern.as_str(), domain))
                                .reinforce();
                        }
                    }
                }
            }
        });

        debug!(
            agent = %record.selected,
            success = record.success,
            patterns = contributing.len(),
            "feedback recorded"
        );
        true
    }

    /// Keywords of the profile that actually appear in the query; these are
    /// the patterns that contributed to (or should have driven) the match.
    fn contributing_patterns(query: &Query, profile: &AgentProfile) -> Vec<String> {
        profile
            .keywords
            .iter()
            .filter(|k| query.contains_pattern(k))
            .cloned()
            .collect()
    }

    fn bump_momentum(table: &mut WeightTable, domain: Domain, signal: f64) {
        let current = table.momentum(domain);
        table.set_momentum(domain, MOMENTUM_DECAY * current + (1.0 - MOMENTUM_DECAY) * signal);
    }

    /// Read-only aggregates; `top_n` bounds the top-pattern list.
    pub fn insights(&self, top_n: usize) -> LearningInsights {
        let table = self.store.snapshot();

        // Storage may run above 1.0 up to the cap; anything leaving the
        // engine is clamped to the reported range.
        let mut best_per_pattern: BTreeMap<String, f64> = BTreeMap::new();
        for (key, state) in table.iter_weights() {
            let entry = best_per_pattern.entry(key.pattern.clone()).or_insert(0.0);
            *entry = entry.max(state.reported_weight());
        }
        let mut top: Vec<(String, f64)> = best_per_pattern.into_iter().collect();
        top.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        top.truncate(top_n);

        LearningInsights {
            total_patterns_tracked: table.len(),
            active_pattern_weights: table
                .iter_weights()
                .filter(|(_, state)| state.is_active())
                .count(),
            context_patterns_learned: table
                .iter_weights()
                .filter(|(key, _)| key.pattern.contains(' '))
                .count(),
            domain_momentum: table.iter_momentum().collect(),
            top_performing_patterns: top,
        }
    }

    /// Best-effort persistence of the full store document. Failure is logged
    /// and reported as `false`; the in-memory store stays authoritative.
    pub async fn persist(&self, repository: &dyn WeightStoreRepository) -> bool {
        let snapshot = self.store.export();
        match repository.save(&snapshot).await {
            Ok(()) => true,
            Err(e) => {
                let error = RouterError::PersistenceFailure(e.to_string());
                warn!(error = %error, "continuing with the in-memory store");
                false
            }
        }
    }

    /// Merge persisted state into the live store. Missing or unreadable
    /// documents leave the store untouched.
    pub async fn restore(&self, repository: &dyn WeightStoreRepository) -> bool {
        match repository.load().await {
            Ok(snapshot) => {
                self.store.merge(snapshot);
                true
            }
            Err(e) => {
                warn!(error = %e, "weight store restore failed; starting from defaults");
                false
            }
        }
    }
}

// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Pattern Weight Store
//!
//! Per-(pattern, domain) learned weights plus per-domain momentum, behind a
//! copy-on-write snapshot. Readers clone an `Arc` of the current immutable
//! table and never block; all mutation is serialized through a single writer
//! lock and lands by swapping in a freshly built table. A selection that
//! started before a feedback update therefore scores against a consistent
//! view for its whole pipeline.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::domain::{Domain, PatternKey, PatternWeight, DEFAULT_WEIGHT};

/// Immutable-once-published table of learned weights and momentum.
#[derive(Debug, Clone, Default)]
pub struct WeightTable {
    weights: HashMap<PatternKey, PatternWeight>,
    momentum: HashMap<Domain, f64>,
}

impl WeightTable {
    /// Learned weight for a pattern as seen by an agent tagged with
    /// `domains`: the strongest signal across those domains, default 1.0
    /// when the pattern was never learned.
    pub fn weight_for(&self, pattern: &str, domains: &[Domain]) -> f64 {
        domains
            .iter()
            .filter_map(|d| self.weights.get(&PatternKey::new(pattern, *d)))
            .map(|w| w.weight)
            .fold(None::<f64>, |acc, w| Some(acc.map_or(w, |a| a.max(w))))
            .unwrap_or(DEFAULT_WEIGHT)
    }

    /// True when any of `domains` carries a learned (non-default) weight for
    /// the pattern.
    pub fn has_learned(&self, pattern: &str, domains: &[Domain]) -> bool {
        domains
            .iter()
            .filter_map(|d| self.weights.get(&PatternKey::new(pattern, *d)))
            .any(|w| w.is_active())
    }

    /// Momentum for a single domain; 0.0 until the first feedback arrives.
    pub fn momentum(&self, domain: Domain) -> f64 {
        self.momentum.get(&domain).copied().unwrap_or(0.0)
    }

    /// Strongest momentum across an agent's domains, used as ranking
    /// tie-break.
    pub fn momentum_for(&self, domains: &[Domain]) -> f64 {
        domains
            .iter()
            .map(|d| self.momentum(*d))
            .fold(0.0, f64::max)
    }

    pub fn get(&self, key: &PatternKey) -> Option<&PatternWeight> {
        self.weights.get(key)
    }

    pub fn entry(&mut self, key: PatternKey) -> &mut PatternWeight {
        self.weights.entry(key).or_default()
    }

    pub fn set_momentum(&mut self, domain: Domain, value: f64) {
        self.momentum.insert(domain, value.clamp(0.0, 1.0));
    }

    pub fn iter_weights(&self) -> impl Iterator<Item = (&PatternKey, &PatternWeight)> {
        self.weights.iter()
    }

    pub fn iter_momentum(&self) -> impl Iterator<Item = (Domain, f64)> + '_ {
        self.momentum.iter().map(|(d, m)| (*d, *m))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// One persisted weight entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPatternWeight {
    pub pattern: String,
    pub domain: Domain,
    #[serde(flatten)]
    pub state: PatternWeight,
}

/// Serializable document form of the store: one section per learned-pattern
/// category. Built fully in memory before it is handed to a repository, so
/// persistence is all-or-nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub pattern_weights: Vec<StoredPatternWeight>,
    #[serde(default)]
    pub domain_momentum: BTreeMap<Domain, f64>,
}

/// The process-lifetime weight store.
pub struct PatternWeightStore {
    current: RwLock<Arc<WeightTable>>,
    writer: Mutex<()>,
}

impl PatternWeightStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(WeightTable::default())),
            writer: Mutex::new(()),
        }
    }

    /// Cheap, non-blocking view of the current table. The returned `Arc`
    /// stays valid (and unchanged) for as long as the caller holds it.
    pub fn snapshot(&self) -> Arc<WeightTable> {
        self.current.read().clone()
    }

    /// Serialized mutation: clone the current table, apply `mutate`, publish
    /// the result. Concurrent readers keep their old snapshot.
    pub fn update<F>(&self, mutate: F)
    where
        F: FnOnce(&mut WeightTable),
    {
        let _writer = self.writer.lock();
        let mut table = WeightTable::clone(&self.snapshot());
        mutate(&mut table);
        *self.current.write() = Arc::new(table);
    }

    /// Merge a loaded document into the live table. Entries win on newer
    /// `last_updated`, so loading never clobbers feedback that arrived while
    /// the document was being read.
    pub fn merge(&self, snapshot: StoreSnapshot) {
        self.update(|table| {
            for stored in snapshot.pattern_weights {
                let key = PatternKey::new(stored.pattern, stored.domain);
                let replace = match table.get(&key) {
                    Some(existing) => stored.state.last_updated > existing.last_updated,
                    None => true,
                };
                if replace {
                    *table.entry(key) = stored.state;
                }
            }
            for (domain, momentum) in snapshot.domain_momentum {
                if table.momentum(domain) == 0.0 {
                    table.set_momentum(domain, momentum);
                }
            }
        });
    }

    /// Full document form of the current table, ordered deterministically.
    pub fn export(&self) -> StoreSnapshot {
        let table = self.snapshot();
        let mut pattern_weights: Vec<StoredPatternWeight> = table
            .iter_weights()
            .map(|(key, state)| StoredPatternWeight {
                pattern: key.pattern.clone(),
                domain: key.domain,
                state: state.clone(),
            })
            .collect();
        pattern_weights.sort_by(|a, b| (&a.pattern, a.domain).cmp(&(&b.pattern, b.domain)));
        StoreSnapshot {
            pattern_weights,
            domain_momentum: table.iter_momentum().collect(),
        }
    }
}

impl Default for PatternWeightStore {
    fn default() -> Self {
        Self::new()
    }
}

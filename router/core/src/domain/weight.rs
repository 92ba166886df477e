// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::agent::Domain;

/// Default weight for a pattern the learning engine has never touched.
pub const DEFAULT_WEIGHT: f64 = 1.0;
/// Stored weights saturate here; repeated identical feedback past the cap
/// is a no-op, so reinforcement cannot run away.
pub const WEIGHT_CAP: f64 = 2.0;
/// Stored weights never drop below this floor, so a pattern that misled a
/// few selections can still recover instead of going inert.
pub const WEIGHT_FLOOR: f64 = 0.1;
/// Per-feedback reinforcement step.
pub const WEIGHT_STEP: f64 = 0.05;
/// Exponential-moving-average decay factor for per-domain momentum.
pub const MOMENTUM_DECAY: f64 = 0.9;

/// Identity of one learned weight: a capability pattern scoped to a domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatternKey {
    pub pattern: String,
    pub domain: Domain,
}

impl PatternKey {
    pub fn new(pattern: impl Into<String>, domain: Domain) -> Self {
        Self {
            pattern: pattern.into().to_lowercase(),
            domain,
        }
    }
}

/// Learned state of one (pattern, domain) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternWeight {
    /// Bounded to [`WEIGHT_FLOOR`], [`WEIGHT_CAP`]. May exceed 1.0 in
    /// storage; reported values are clamped to [0, 1].
    pub weight: f64,
    pub success_count: u64,
    pub failure_count: u64,
    pub last_updated: DateTime<Utc>,
}

impl PatternWeight {
    pub fn new() -> Self {
        Self {
            weight: DEFAULT_WEIGHT,
            success_count: 0,
            failure_count: 0,
            last_updated: Utc::now(),
        }
    }

    /// Bounded reinforcement. Saturates at [`WEIGHT_CAP`].
    pub fn reinforce(&mut self) {
        self.weight = (self.weight + WEIGHT_STEP).min(WEIGHT_CAP);
        self.success_count += 1;
        self.last_updated = Utc::now();
    }

    /// Bounded penalty. Saturates at [`WEIGHT_FLOOR`].
    pub fn penalize(&mut self) {
        self.weight = (self.weight - WEIGHT_STEP).max(WEIGHT_FLOOR);
        self.failure_count += 1;
        self.last_updated = Utc::now();
    }

    /// True once feedback has moved this weight off the default.
    pub fn is_active(&self) -> bool {
        (self.weight - DEFAULT_WEIGHT).abs() > f64::EPSILON
    }

    /// Weight as exposed to callers: clamped to [0, 1].
    pub fn reported_weight(&self) -> f64 {
        self.weight.clamp(0.0, 1.0)
    }
}

impl Default for PatternWeight {
    fn default() -> Self {
        Self::new()
    }
}

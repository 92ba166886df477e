// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::agent::AgentId;

/// Ground-truth report about one past selection.
///
/// Created by callers once correctness is known, consumed exactly once by the
/// learning engine; only its aggregate effect on pattern weights persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub query: String,
    pub selected: AgentId,
    /// Confidence the router reported for the selection.
    pub confidence: f64,
    pub success: bool,
    /// The agent that should have been selected, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<AgentId>,
    pub timestamp: DateTime<Utc>,
}

impl FeedbackRecord {
    pub fn success(query: impl Into<String>, selected: AgentId, confidence: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            query: query.into(),
            selected,
            confidence,
            success: true,
            expected: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failure(
        query: impl Into<String>,
        selected: AgentId,
        confidence: f64,
        expected: Option<AgentId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            query: query.into(),
            selected,
            confidence,
            success: false,
            expected,
            timestamp: Utc::now(),
        }
    }
}

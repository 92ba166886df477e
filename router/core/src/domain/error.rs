// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Degraded-condition taxonomy for the router core.
//!
//! None of these abort a selection: the pipeline always resolves to a valid
//! [`MatchResult`](super::selection::MatchResult) with reduced confidence and
//! an explanatory reasoning string. The taxonomy drives logging and the
//! fallback paths; only registry/store initialization failures are surfaced
//! to the process owner as fatal.

use thiserror::Error;

use super::agent::AgentId;

#[derive(Debug, Error)]
pub enum RouterError {
    /// Never fatal; degrades to a zero-confidence fallback selection.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No agents loaded; every selection returns the designated fallback
    /// agent with confidence 0.
    #[error("agent registry is empty or unavailable")]
    RegistryUnavailable,

    /// In-memory state remains authoritative; no caller retry required.
    #[error("weight store persistence failed: {0}")]
    PersistenceFailure(String),

    /// Feedback referenced an unknown agent; recorded as a no-op.
    #[error("feedback rejected: unknown agent {0}")]
    LearningUpdateRejected(AgentId),
}

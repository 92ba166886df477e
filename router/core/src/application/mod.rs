// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Application layer for the router core
//!
//! The selection pipeline: capability matching, domain boundary detection,
//! conflict resolution, feedback learning, and the selector facade that
//! drives them in order.

pub mod matcher;
pub mod boundary_detector;
pub mod conflict_resolver;
pub mod learning_engine;
pub mod selector;

pub use matcher::{CapabilityMatcher, RawScore};
pub use boundary_detector::DomainBoundaryDetector;
pub use conflict_resolver::ConflictResolver;
pub use learning_engine::{LearningEngine, LearningInsights};
pub use selector::AgentSelector;

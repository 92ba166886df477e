// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! AEGIS Router Core
//!
//! Routes a free-form natural-language request to the best-matching
//! specialist agent out of a fixed registry of capability profiles.
//!
//! # Architecture
//!
//! - **Layer:** Selection & Learning Core
//! - **Purpose:** Scoring, boundary detection, conflict resolution, feedback learning

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
pub use application::*;
pub use infrastructure::*;

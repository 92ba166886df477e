// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain model for the AEGIS router
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Agents, queries, boundaries, conflicts, weights, feedback

pub mod agent;
pub mod query;
pub mod boundary;
pub mod conflict;
pub mod weight;
pub mod selection;
pub mod feedback;
pub mod error;

pub use agent::*;
pub use query::*;
pub use boundary::*;
pub use conflict::*;
pub use weight::*;
pub use selection::*;
pub use feedback::*;
pub use error::*;

// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Infrastructure layer for the router core

pub mod weight_store;
pub mod repository;

pub use weight_store::{PatternWeightStore, StoreSnapshot, StoredPatternWeight, WeightTable};
pub use repository::{InMemoryWeightRepository, JsonFileWeightRepository, WeightStoreRepository};

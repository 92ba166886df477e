// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! AEGIS Router Registry
//!
//! Loads K8s-style agent profile manifests into the router core's read-only
//! registry. The core never parses configuration itself; this crate is the
//! anti-corruption layer between YAML documents and the domain model.
//!
//! # Architecture
//!
//! - **Layer:** Configuration Collaborator
//! - **Purpose:** Parse and validate agent profile manifests

pub mod manifest;
pub mod loader;

pub use manifest::{ProfileManifest, ProfileManifestParser};
pub use loader::RegistryLoader;

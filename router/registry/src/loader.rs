// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Registry directory loader
//!
//! Walks a profile directory for `.yaml`/`.yml` manifests and assembles the
//! core's read-only [`AgentRegistry`]. Failures here are startup failures:
//! a malformed manifest or a duplicate agent name aborts the load with
//! context instead of silently dropping a profile.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::info;
use walkdir::WalkDir;

use aegis_router_core::domain::AgentRegistry;

use crate::manifest::ProfileManifestParser;

pub struct RegistryLoader;

impl RegistryLoader {
    /// Load every manifest under `dir` (recursively) into a registry.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<AgentRegistry> {
        let dir = dir.as_ref();
        let mut registry = AgentRegistry::new();
        let mut loaded = 0usize;

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry =
                entry.with_context(|| format!("failed to walk profile directory: {:?}", dir))?;
            if !entry.file_type().is_file() || !is_manifest_path(entry.path()) {
                continue;
            }

            let manifest = ProfileManifestParser::parse_file(entry.path())
                .with_context(|| format!("invalid agent profile: {:?}", entry.path()))?;
            let profile = manifest.into_profile();
            if registry.contains(&profile.id) {
                return Err(anyhow!(
                    "duplicate agent name {:?} in {:?}",
                    profile.id.as_str(),
                    entry.path()
                ));
            }
            registry.register(profile);
            loaded += 1;
        }

        if registry.is_empty() {
            return Err(anyhow!("no agent profiles found under {:?}", dir));
        }

        info!(count = loaded, dir = ?dir, "agent registry loaded");
        Ok(registry)
    }
}

fn is_manifest_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

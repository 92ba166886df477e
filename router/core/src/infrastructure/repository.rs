// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Repository interface for weight-store persistence
//!
//! The learning engine stays fully unit-testable against the in-memory
//! implementation; the JSON file implementation is the best-effort on-disk
//! store. Persistence failure is never fatal to callers: the in-memory
//! store remains authoritative.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;

use super::weight_store::StoreSnapshot;

/// Narrow persistence contract for the pattern weight store.
#[async_trait]
pub trait WeightStoreRepository: Send + Sync {
    /// Load the persisted document. An absent store loads as empty.
    async fn load(&self) -> Result<StoreSnapshot>;

    /// Persist a fully built document, all-or-nothing.
    async fn save(&self, snapshot: &StoreSnapshot) -> Result<()>;
}

/// JSON-document store on the local filesystem.
///
/// Writes go to a temporary sibling first and land via atomic rename, so a
/// crash mid-write never corrupts the previous document.
pub struct JsonFileWeightRepository {
    path: PathBuf,
}

impl JsonFileWeightRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut os = self.path.as_os_str().to_os_string();
        os.push(".tmp");
        PathBuf::from(os)
    }
}

#[async_trait]
impl WeightStoreRepository for JsonFileWeightRepository {
    async fn load(&self) -> Result<StoreSnapshot> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("malformed weight store document: {:?}", self.path)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreSnapshot::default()),
            Err(e) => {
                Err(e).with_context(|| format!("failed to read weight store: {:?}", self.path))
            }
        }
    }

    async fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        let json = serde_json::to_vec_pretty(snapshot)
            .context("failed to serialize weight store document")?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("failed to create store directory: {:?}", parent))?;
            }
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &json)
            .await
            .with_context(|| format!("failed to write weight store temp file: {:?}", temp))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .with_context(|| format!("failed to replace weight store: {:?}", self.path))?;
        Ok(())
    }
}

/// In-memory repository for tests and ephemeral deployments.
#[derive(Default)]
pub struct InMemoryWeightRepository {
    stored: Mutex<Option<StoreSnapshot>>,
}

impl InMemoryWeightRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WeightStoreRepository for InMemoryWeightRepository {
    async fn load(&self) -> Result<StoreSnapshot> {
        Ok(self.stored.lock().clone().unwrap_or_default())
    }

    async fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        *self.stored.lock() = Some(snapshot.clone());
        Ok(())
    }
}

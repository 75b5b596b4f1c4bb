use crate::authoring::{build_tree, parse_tree_json};
use crate::error::CatalogError;
use crate::types::{CatalogEntry, Timestamp, TreeDefinition, Version};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// One row of a `list()` response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogSummary {
    pub name: String,
    pub version: Version,
}

/// The named collection of stored tree definitions.
///
/// `put` with an existing name replaces the entry and bumps the
/// version; the superseded definition is discarded. A failed `put`
/// (malformed or invalid source) leaves any stored version intact.
/// Implementations serialize `put`/`delete`/`get` so concurrent
/// version bumps are never lost.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Parse, validate and store a JSON tree source under `name`.
    /// Returns the new version (1 for a fresh name).
    async fn put(&self, name: &str, source: &str) -> Result<Version, CatalogError>;

    async fn get(&self, name: &str) -> Result<Arc<TreeDefinition>, CatalogError>;

    /// Remove the entry regardless of version.
    async fn delete(&self, name: &str) -> Result<(), CatalogError>;

    /// Remove the entry only if `version` matches the stored one
    /// (optimistic-concurrency guard).
    async fn delete_version(&self, name: &str, version: Version) -> Result<(), CatalogError>;

    /// All entries, in an order that is stable across immediately
    /// subsequent identical calls.
    async fn list(&self) -> Result<Vec<CatalogSummary>, CatalogError>;

    /// Drop every entry. Store lifecycle is init-empty / teardown-clear.
    async fn clear(&self) -> Result<(), CatalogError>;
}

// ── MemoryCatalog ──

/// In-memory catalog for tests and single-process use.
///
/// A single lock over a `BTreeMap` — contention is expected to be
/// low, and the map's key order makes `list` stable (lexicographic
/// by name).
pub struct MemoryCatalog {
    inner: RwLock<BTreeMap<String, CatalogEntry>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }

    /// Source digest of the stored entry, for identity checks.
    pub fn digest(&self, name: &str) -> Result<[u8; 32], CatalogError> {
        let store = self
            .inner
            .read()
            .map_err(|e| CatalogError::Lock(e.to_string()))?;
        store
            .get(name)
            .map(|entry| entry.source_digest)
            .ok_or_else(|| CatalogError::NotFound {
                name: name.to_string(),
            })
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn put(&self, name: &str, source: &str) -> Result<Version, CatalogError> {
        let doc = parse_tree_json(source)?;
        let mut store = self
            .inner
            .write()
            .map_err(|e| CatalogError::Lock(e.to_string()))?;

        let version = store.get(name).map(|e| e.version + 1).unwrap_or(1);
        // build under the lock: a concurrent put must not interleave
        // between the version read and the insert
        let definition = Arc::new(build_tree(name, version, &doc)?);
        store.insert(
            name.to_string(),
            CatalogEntry {
                name: name.to_string(),
                version,
                definition,
                source_digest: Sha256::digest(source.as_bytes()).into(),
                created_at: now_ms(),
            },
        );
        debug!(name, version, "tree stored");
        Ok(version)
    }

    async fn get(&self, name: &str) -> Result<Arc<TreeDefinition>, CatalogError> {
        let store = self
            .inner
            .read()
            .map_err(|e| CatalogError::Lock(e.to_string()))?;
        store
            .get(name)
            .map(|entry| Arc::clone(&entry.definition))
            .ok_or_else(|| CatalogError::NotFound {
                name: name.to_string(),
            })
    }

    async fn delete(&self, name: &str) -> Result<(), CatalogError> {
        let mut store = self
            .inner
            .write()
            .map_err(|e| CatalogError::Lock(e.to_string()))?;
        if store.remove(name).is_none() {
            return Err(CatalogError::NotFound {
                name: name.to_string(),
            });
        }
        debug!(name, "tree deleted");
        Ok(())
    }

    async fn delete_version(&self, name: &str, version: Version) -> Result<(), CatalogError> {
        let mut store = self
            .inner
            .write()
            .map_err(|e| CatalogError::Lock(e.to_string()))?;
        let current = store
            .get(name)
            .map(|entry| entry.version)
            .ok_or_else(|| CatalogError::NotFound {
                name: name.to_string(),
            })?;
        if current != version {
            return Err(CatalogError::VersionConflict {
                name: name.to_string(),
                requested: version,
                current,
            });
        }
        store.remove(name);
        debug!(name, version, "tree deleted (versioned)");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<CatalogSummary>, CatalogError> {
        let store = self
            .inner
            .read()
            .map_err(|e| CatalogError::Lock(e.to_string()))?;
        Ok(store
            .values()
            .map(|entry| CatalogSummary {
                name: entry.name.clone(),
                version: entry.version,
            })
            .collect())
    }

    async fn clear(&self) -> Result<(), CatalogError> {
        let mut store = self
            .inner
            .write()
            .map_err(|e| CatalogError::Lock(e.to_string()))?;
        store.clear();
        Ok(())
    }
}

pub(crate) fn now_ms() -> Timestamp {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as Timestamp
}

//! Preferences repository
//!
//! Key-value storage for client preferences that survive a restart.
//! Values are stored as JSON-encoded strings, and the file backend keeps the
//! whole map in a single JSON object.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Repository trait for preference operations
#[async_trait]
pub trait PreferencesRepository: Send + Sync {
    /// Get a single preference by key
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a single preference
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Preferences kept in a JSON file on disk
#[derive(Debug)]
pub struct JsonFilePreferencesRepository {
    path: PathBuf,
    write_lock: RwLock<()>,
}

impl JsonFilePreferencesRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: RwLock::new(()),
        }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(path: impl Into<PathBuf>) -> Arc<dyn PreferencesRepository> {
        Arc::new(Self::new(path))
    }

    async fn read_map(&self) -> Result<BTreeMap<String, String>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read preferences file '{}'", self.path.display())
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse preferences file '{}'", self.path.display())
        })
    }
}

#[async_trait]
impl PreferencesRepository for JsonFilePreferencesRepository {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.write_lock.read().await;
        let map = self.read_map().await?;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.write().await;

        // An unreadable file is replaced rather than blocking every write.
        let mut map = self.read_map().await.unwrap_or_default();
        map.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
            }
        }

        let json = serde_json::to_string_pretty(&map).context("Failed to serialize preferences")?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write preferences file '{}'", self.path.display()))?;
        Ok(())
    }
}

/// Preferences kept only in memory
#[derive(Debug, Default)]
pub struct MemoryPreferencesRepository {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryPreferencesRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed() -> Arc<dyn PreferencesRepository> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl PreferencesRepository for MemoryPreferencesRepository {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

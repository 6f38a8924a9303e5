use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, warn};

/// String key/value store persisted as a single JSON file.
///
/// Plays the part of browser local storage: read once when opened, and the
/// whole file rewritten on every change.
#[derive(Debug)]
pub struct LocalStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LocalStorage {
    /// Open the store, treating a missing or unreadable file as empty
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Discarding malformed local storage {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("Could not read local storage {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        debug!("Opened local storage {} ({} keys)", path.display(), entries.len());
        Self { path, entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub async fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.flush().await
    }

    async fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

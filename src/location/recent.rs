use crate::location::storage::LocalStorage;
use anyhow::Result;
use tracing::{debug, warn};

/// Storage key holding the JSON-encoded recent list
pub const RECENT_LOCATIONS_KEY: &str = "recentLocations";
pub const MAX_RECENT_LOCATIONS: usize = 5;

/// Most-recently-used location labels, newest first
#[derive(Debug)]
pub struct RecentLocations {
    storage: LocalStorage,
    items: Vec<String>,
}

impl RecentLocations {
    /// Restore the list from storage; malformed data is dropped
    pub fn load(storage: LocalStorage) -> Self {
        let items = match storage.get(RECENT_LOCATIONS_KEY) {
            Some(raw) => match serde_json::from_str::<Vec<String>>(raw) {
                Ok(items) => normalize(items),
                Err(e) => {
                    warn!("Discarding malformed recent locations: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        debug!("Loaded {} recent locations", items.len());
        Self { storage, items }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Move `label` to the front, keeping at most five entries
    pub async fn record(&mut self, label: &str) -> Result<()> {
        if label.trim().is_empty() {
            return Ok(());
        }
        self.items.retain(|item| item != label);
        self.items.insert(0, label.to_string());
        self.items.truncate(MAX_RECENT_LOCATIONS);
        self.persist().await
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.items.clear();
        self.persist().await
    }

    async fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.items)?;
        self.storage.set(RECENT_LOCATIONS_KEY, json).await
    }
}

fn normalize(items: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(MAX_RECENT_LOCATIONS);
    for item in items {
        if unique.len() == MAX_RECENT_LOCATIONS {
            break;
        }
        if !item.trim().is_empty() && !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

use crate::config::SuggestionConfig;
use crate::geo::{GeocodeHit, Geocoder};
use crate::models::LocationSuggestion;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// What a call to [`SuggestionFetcher::on_input`] did to the visible list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionUpdate {
    /// Input too short; list emptied and hidden
    Cleared,
    /// List replaced with this many candidates
    Replaced(usize),
    /// A newer input arrived first; nothing changed
    Superseded,
}

/// Debounced place suggestions for a text input.
///
/// Each input is tagged with a sequence number. Only the holder of the latest
/// tag may touch the visible list, so a slow response to an old keystroke can
/// never overwrite the answer to a newer one.
pub struct SuggestionFetcher {
    geocoder: Arc<dyn Geocoder>,
    config: SuggestionConfig,
    latest: AtomicU64,
    visible: Mutex<Vec<LocationSuggestion>>,
}

impl SuggestionFetcher {
    pub fn new(geocoder: Arc<dyn Geocoder>, config: SuggestionConfig) -> Self {
        Self {
            geocoder,
            config,
            latest: AtomicU64::new(0),
            visible: Mutex::new(Vec::new()),
        }
    }

    /// Handle the current contents of the input field
    pub async fn on_input(&self, input: &str) -> SuggestionUpdate {
        let tag = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let term = input.trim();

        if term.chars().count() < self.config.min_chars {
            return if self.publish(tag, Vec::new()) {
                SuggestionUpdate::Cleared
            } else {
                SuggestionUpdate::Superseded
            };
        }

        tokio::time::sleep(self.config.debounce()).await;
        if !self.is_latest(tag) {
            debug!("Input '{}' superseded during debounce", term);
            return SuggestionUpdate::Superseded;
        }

        let suggestions: Vec<LocationSuggestion> = match self.geocoder.search(term, self.config.limit).await {
            Ok(hits) => hits
                .into_iter()
                .take(self.config.limit)
                .map(to_suggestion)
                .collect(),
            Err(e) => {
                warn!("Suggestion lookup for '{}' failed: {:#}", term, e);
                Vec::new()
            }
        };

        let count = suggestions.len();
        if self.publish(tag, suggestions) {
            SuggestionUpdate::Replaced(count)
        } else {
            debug!("Discarding stale suggestions for '{}'", term);
            SuggestionUpdate::Superseded
        }
    }

    /// Currently visible candidates
    pub fn suggestions(&self) -> Vec<LocationSuggestion> {
        self.visible
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_visible(&self) -> bool {
        !self
            .visible
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    fn is_latest(&self, tag: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == tag
    }

    fn publish(&self, tag: u64, suggestions: Vec<LocationSuggestion>) -> bool {
        let mut visible = self.visible.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.is_latest(tag) {
            return false;
        }
        *visible = suggestions;
        true
    }
}

fn to_suggestion(hit: GeocodeHit) -> LocationSuggestion {
    let name = hit
        .display_name
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    LocationSuggestion {
        name,
        display_name: hit.display_name,
        latitude: hit.latitude,
        longitude: hit.longitude,
    }
}

use crate::config::Config;
use crate::error::SearchRejection;
use crate::geo::{Geocoder, NominatimClient, PostcodeLookup, PostcodesClient};
use crate::listings::{ListingsProvider, MockListings, ZooplaClient};
use crate::location::{LocalStorage, LocationResolver, RecentLocations, Resolution};
use crate::models::{ResolvedLocation, SearchFilters};
use crate::search::{SearchObserver, SearchOrchestrator, SearchOutcome};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// What happened to a location search typed or picked by the user
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSearch {
    Rejected(SearchRejection),
    NotFound,
    Unavailable(String),
    Searched {
        location: ResolvedLocation,
        outcome: SearchOutcome,
    },
}

impl LocationSearch {
    /// User-facing message for anything other than a successful search
    pub fn message(&self) -> Option<String> {
        match self {
            LocationSearch::Rejected(rejection) => Some(rejection.to_string()),
            LocationSearch::NotFound => {
                Some("Location not found. Try a postcode or a town name.".to_string())
            }
            LocationSearch::Unavailable(error) => {
                Some(format!("Could not look up that location: {error}"))
            }
            LocationSearch::Searched { outcome, .. } => outcome.message(),
        }
    }
}

/// One user session: filters, recent locations and the throttled search.
pub struct ScoutSession {
    resolver: LocationResolver,
    orchestrator: SearchOrchestrator,
    recent: RecentLocations,
    pub filters: SearchFilters,
}

impl ScoutSession {
    pub fn new(
        resolver: LocationResolver,
        orchestrator: SearchOrchestrator,
        recent: RecentLocations,
    ) -> Self {
        Self {
            resolver,
            orchestrator,
            recent,
            filters: SearchFilters::default(),
        }
    }

    /// Wire up the real services (or the mock listings source) from config
    pub async fn from_config(config: &Config) -> Result<Self> {
        let geocoder: Arc<dyn Geocoder> = Arc::new(NominatimClient::new(&config.endpoints)?);
        let postcodes: Arc<dyn PostcodeLookup> =
            Arc::new(PostcodesClient::new(&config.endpoints)?);
        let provider: Arc<dyn ListingsProvider> = if config.use_mock_data {
            info!("Mock data mode: listings will not use API credits");
            Arc::new(MockListings::new())
        } else {
            Arc::new(ZooplaClient::new(&config.endpoints)?)
        };

        let storage = LocalStorage::open(config.storage_path()?).await;
        Ok(Self::new(
            LocationResolver::new(geocoder, postcodes),
            SearchOrchestrator::new(provider, config.search.clone()),
            RecentLocations::load(storage),
        ))
    }

    pub fn recent(&self) -> &[String] {
        self.recent.items()
    }

    pub fn orchestrator(&self) -> &SearchOrchestrator {
        &self.orchestrator
    }

    /// Resolve `input`, remember it, then search around the canonical label
    pub async fn search_location(
        &mut self,
        input: &str,
        observer: &dyn SearchObserver,
    ) -> LocationSearch {
        if input.trim().is_empty() {
            return LocationSearch::Rejected(SearchRejection::EmptyTerm);
        }

        let location = match self.resolver.resolve(input).await {
            Resolution::Resolved(location) => location,
            Resolution::NotFound => return LocationSearch::NotFound,
            Resolution::TransientError(error) => return LocationSearch::Unavailable(error),
        };

        self.filters.set_location(&location);
        if let Err(e) = self.recent.record(&location.label).await {
            warn!("Could not save recent location: {:#}", e);
        }

        let outcome = self
            .orchestrator
            .search(&location.label, &self.filters, observer)
            .await;
        LocationSearch::Searched { location, outcome }
    }

    /// Search again from a recent label; coordinates are looked up afresh
    pub async fn search_recent(
        &mut self,
        index: usize,
        observer: &dyn SearchObserver,
    ) -> Option<LocationSearch> {
        let label = self.recent.items().get(index)?.clone();
        Some(self.search_location(&label, observer).await)
    }
}

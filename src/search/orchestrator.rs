use crate::config::SearchConfig;
use crate::error::SearchRejection;
use crate::listings::{apply_filters, ListingQuery, ListingsProvider};
use crate::models::{MappedProperty, SearchFilters};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Hooks bracketing each call to the listings API
pub trait SearchObserver: Send + Sync {
    fn on_search_start(&self, _term: &str) {}
    fn on_search_complete(&self, _term: &str) {}
}

pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// Result of one search attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Results(Vec<MappedProperty>),
    Rejected(SearchRejection),
    /// The listings call failed; no results
    Failed(String),
}

impl SearchOutcome {
    pub fn properties(&self) -> &[MappedProperty] {
        match self {
            SearchOutcome::Results(properties) => properties,
            _ => &[],
        }
    }

    /// User-facing message for anything other than results
    pub fn message(&self) -> Option<String> {
        match self {
            SearchOutcome::Results(_) => None,
            SearchOutcome::Rejected(rejection) => Some(rejection.to_string()),
            SearchOutcome::Failed(error) => Some(format!("Search failed: {error}")),
        }
    }
}

/// Per-session throttling state
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionRateState {
    last_search: Option<Instant>,
    search_count: u32,
    reserved_at: Option<Instant>,
    in_flight: u32,
}

impl SessionRateState {
    pub fn last_search(&self) -> Option<Instant> {
        self.last_search
    }

    /// Successful searches so far; never decreases
    pub fn search_count(&self) -> u32 {
        self.search_count
    }

    fn check(&self, now: Instant, rate_limit: Duration, max: u32) -> Result<(), SearchRejection> {
        if let Some(latest) = self.last_search.max(self.reserved_at) {
            let elapsed = now.saturating_duration_since(latest);
            if elapsed < rate_limit {
                let remaining_ms = (rate_limit - elapsed).as_millis();
                let wait_secs = remaining_ms.div_ceil(1000) as u64;
                return Err(SearchRejection::RateLimited { wait_secs });
            }
        }
        if self.search_count + self.in_flight >= max {
            return Err(SearchRejection::SessionCapReached { max });
        }
        Ok(())
    }
}

/// Throttled entry point to the listings API.
///
/// Owns the session's rate state. Guards run before any await, and a passing
/// attempt holds a reservation until its call finishes, so overlapping
/// attempts see each other.
pub struct SearchOrchestrator {
    provider: Arc<dyn ListingsProvider>,
    config: SearchConfig,
    state: Mutex<SessionRateState>,
}

impl SearchOrchestrator {
    pub fn new(provider: Arc<dyn ListingsProvider>, config: SearchConfig) -> Self {
        Self {
            provider,
            config,
            state: Mutex::new(SessionRateState::default()),
        }
    }

    pub fn state(&self) -> SessionRateState {
        *self.lock()
    }

    pub fn remaining_searches(&self) -> u32 {
        let state = self.lock();
        self.config
            .max_searches_per_session
            .saturating_sub(state.search_count + state.in_flight)
    }

    pub async fn search(
        &self,
        term: &str,
        filters: &SearchFilters,
        observer: &dyn SearchObserver,
    ) -> SearchOutcome {
        let term = term.trim();
        if term.is_empty() {
            return SearchOutcome::Rejected(SearchRejection::EmptyTerm);
        }

        let mut reservation = match self.reserve(Instant::now()) {
            Ok(reservation) => reservation,
            Err(rejection) => {
                info!("Search for '{}' rejected: {}", term, rejection);
                return SearchOutcome::Rejected(rejection);
            }
        };

        let query = ListingQuery {
            area: term.to_string(),
            radius: filters.radius,
            page_size: self.config.page_size,
        };
        info!("Searching {} for '{}'", self.provider.source_name(), term);

        let _bracket = Bracket::open(observer, term);
        match self.provider.search(&query).await {
            Ok(properties) => {
                reservation.commit();
                let total = properties.len();
                let filtered = apply_filters(properties, filters, self.config.filters);
                info!("Found {} listings, {} after filters", total, filtered.len());
                SearchOutcome::Results(filtered)
            }
            Err(e) => {
                warn!("Listings search for '{}' failed: {:#}", term, e);
                SearchOutcome::Failed(format!("{e:#}"))
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionRateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn reserve(&self, now: Instant) -> Result<Reservation<'_>, SearchRejection> {
        let mut state = self.lock();
        state.check(
            now,
            self.config.rate_limit(),
            self.config.max_searches_per_session,
        )?;
        state.reserved_at = Some(now);
        state.in_flight += 1;
        Ok(Reservation {
            orchestrator: self,
            started: now,
            committed: false,
        })
    }
}

/// Holds a search slot while the listings call is outstanding.
/// Dropped without `commit`, the slot is handed back.
struct Reservation<'a> {
    orchestrator: &'a SearchOrchestrator,
    started: Instant,
    committed: bool,
}

impl Reservation<'_> {
    fn commit(&mut self) {
        let mut state = self.orchestrator.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        state.search_count += 1;
        state.last_search = state.last_search.max(Some(self.started));
        if state.reserved_at == Some(self.started) {
            state.reserved_at = None;
        }
        debug!("Search {} committed", state.search_count);
        self.committed = true;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        let mut state = self.orchestrator.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.reserved_at == Some(self.started) {
            state.reserved_at = None;
        }
        debug!("Search slot released");
    }
}

/// Runs the start hook now and the completion hook when dropped
struct Bracket<'a> {
    observer: &'a dyn SearchObserver,
    term: &'a str,
}

impl<'a> Bracket<'a> {
    fn open(observer: &'a dyn SearchObserver, term: &'a str) -> Self {
        observer.on_search_start(term);
        Self { observer, term }
    }
}

impl Drop for Bracket<'_> {
    fn drop(&mut self) {
        self.observer.on_search_complete(self.term);
    }
}

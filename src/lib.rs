//! Location-aware UK property search.
//!
//! Free text is resolved to a postcode or place through public geocoding
//! services, then used to query a listings provider under per-session
//! rate and credit limits.

pub mod config;
pub mod error;
pub mod geo;
pub mod listings;
pub mod location;
pub mod models;
pub mod search;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use error::SearchRejection;
pub use location::{LocationResolver, Resolution};
pub use models::{MappedProperty, ResolvedLocation, SearchFilters};
pub use search::{SearchOrchestrator, SearchOutcome};
pub use session::{LocationSearch, ScoutSession};

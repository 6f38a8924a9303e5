pub mod recent;
pub mod resolver;
pub mod storage;
pub mod suggestions;

pub use recent::{RecentLocations, MAX_RECENT_LOCATIONS, RECENT_LOCATIONS_KEY};
pub use resolver::{LocationResolver, Resolution};
pub use storage::LocalStorage;
pub use suggestions::{SuggestionFetcher, SuggestionUpdate};

pub mod filters;
pub mod mock;
pub mod traits;
pub mod zoopla;

pub use filters::apply_filters;
pub use mock::MockListings;
pub use traits::{ListingQuery, ListingsProvider};
pub use zoopla::ZooplaClient;

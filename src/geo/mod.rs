pub mod nominatim;
pub mod pattern;
pub mod postcodes;
pub mod traits;

pub use nominatim::NominatimClient;
pub use pattern::{is_uk_postcode, normalize_postcode};
pub use postcodes::PostcodesClient;
pub use traits::{GeocodeHit, Geocoder, PostcodeLookup, PostcodeRecord};

use anyhow::Result;
use async_trait::async_trait;

/// One forward-geocoding match
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeHit {
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Administrative data returned for a postcode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostcodeRecord {
    pub postcode: String,
    pub latitude: f64,
    pub longitude: f64,
    pub parish: Option<String>,
    pub admin_district: Option<String>,
    pub admin_county: Option<String>,
    pub country: Option<String>,
}

/// Free-text place search, scoped to the UK
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Ordered matches for `query`, at most `limit`
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeocodeHit>>;
}

/// Postcode reference service
#[async_trait]
pub trait PostcodeLookup: Send + Sync {
    /// Exact lookup; `Ok(None)` when the service does not know the postcode
    async fn lookup(&self, postcode: &str) -> Result<Option<PostcodeRecord>>;

    /// Nearest postcode to the given coordinates
    async fn nearest(&self, latitude: f64, longitude: f64) -> Result<Option<String>>;
}

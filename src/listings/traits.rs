use crate::models::MappedProperty;
use anyhow::Result;
use async_trait::async_trait;

/// Parameters sent to a listings provider
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    /// Free-text area, passed through as typed
    pub area: String,
    /// Radius in miles around the area
    pub radius: Option<f64>,
    pub page_size: u32,
}

/// Common trait for listing sources.
/// Every call to a metered provider costs one credit.
#[async_trait]
pub trait ListingsProvider: Send + Sync {
    /// Fetch listings matching the query
    async fn search(&self, query: &ListingQuery) -> Result<Vec<MappedProperty>>;

    /// Get the name of the listing source
    fn source_name(&self) -> &'static str;
}

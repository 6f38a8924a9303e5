use crate::listings::traits::{ListingQuery, ListingsProvider};
use crate::models::{estimate_returns, MappedProperty, Source};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

/// (street, property type, price, bedrooms, bathrooms, square feet)
const TEMPLATES: &[(&str, &str, i64, u32, u32, u32)] = &[
    ("14 High Street", "Flat", 185_000, 1, 1, 540),
    ("7 Station Road", "Terraced house", 265_000, 3, 1, 980),
    ("22 Church Lane", "Semi-detached house", 340_000, 3, 2, 1_150),
    ("3 Victoria Court", "Flat", 215_000, 2, 1, 690),
    ("48 Park Avenue", "Detached house", 525_000, 4, 3, 1_820),
    ("11 Mill View", "Bungalow", 295_000, 2, 1, 860),
    ("9 Queens Road", "End terrace house", 238_000, 2, 1, 820),
    ("61 Manor Way", "Detached house", 610_000, 5, 3, 2_240),
];

/// Deterministic stand-in for the metered listings API.
///
/// Returns the same handful of listings for any area, placed in that area,
/// so search flows can be exercised without spending credits.
#[derive(Debug, Clone, Default)]
pub struct MockListings;

impl MockListings {
    pub fn new() -> Self {
        Self
    }

    fn listings_for(&self, area: &str) -> Vec<MappedProperty> {
        let slug: String = area
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        TEMPLATES
            .iter()
            .enumerate()
            .map(|(i, &(street, property_type, price, bedrooms, bathrooms, square_feet))| {
                let (estimated_monthly_rent, estimated_roi) = estimate_returns(price, bedrooms);
                MappedProperty {
                    id: format!("mock_{slug}_{}", i + 1),
                    source: Source::Mock,
                    address: format!("{street}, {area}"),
                    price,
                    bedrooms,
                    bathrooms: Some(bathrooms),
                    square_feet: Some(square_feet),
                    description: format!(
                        "{bedrooms} bedroom {} in {area}.",
                        property_type.to_lowercase()
                    ),
                    property_type: property_type.to_string(),
                    image_url: None,
                    agent: Some("Mock Estates".to_string()),
                    estimated_monthly_rent,
                    estimated_roi,
                    latitude: None,
                    longitude: None,
                    fetched_at: Utc::now(),
                }
            })
            .collect()
    }
}

#[async_trait]
impl ListingsProvider for MockListings {
    async fn search(&self, query: &ListingQuery) -> Result<Vec<MappedProperty>> {
        info!("📋 Generating mock listings for '{}'", query.area);
        let mut listings = self.listings_for(&query.area);
        listings.truncate(query.page_size as usize);
        Ok(listings)
    }

    fn source_name(&self) -> &'static str {
        "Mock"
    }
}

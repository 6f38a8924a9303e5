use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source of the property listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Source {
    Zoopla,
    Mock,
}

/// A candidate place offered while the user is typing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationSuggestion {
    pub name: String,
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Outcome of resolving free text to a place
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Canonical label stored as the filter's location value
    pub label: String,
    pub postcode: Option<String>,
}

/// Normalized listing record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MappedProperty {
    pub id: String,
    pub source: Source,
    pub address: String,
    pub price: i64,
    pub bedrooms: u32,
    pub bathrooms: Option<u32>,
    pub square_feet: Option<u32>,
    pub description: String,
    pub property_type: String,
    pub image_url: Option<String>,
    pub agent: Option<String>,
    pub estimated_monthly_rent: f64,
    /// Gross yield in percent
    pub estimated_roi: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub fetched_at: DateTime<Utc>,
}

/// Rough rental estimate for a listing: (monthly rent, gross yield %).
pub fn estimate_returns(price: i64, bedrooms: u32) -> (f64, f64) {
    let rent = 500.0 + 275.0 * f64::from(bedrooms.max(1));
    if price <= 0 {
        return (rent, 0.0);
    }
    let roi = rent * 12.0 / price as f64 * 100.0;
    (rent, (roi * 10.0).round() / 10.0)
}

/// User-editable search filters
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchFilters {
    pub property_type: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_bedrooms: Option<u32>,
    pub max_bedrooms: Option<u32>,
    pub min_bathrooms: Option<u32>,
    pub max_bathrooms: Option<u32>,
    pub min_square_feet: Option<u32>,
    pub max_square_feet: Option<u32>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Search radius in miles
    pub radius: Option<f64>,
    pub needs_work: Option<bool>,
}

impl SearchFilters {
    /// Reset every field
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Store a resolved location as the active location filter
    pub fn set_location(&mut self, location: &ResolvedLocation) {
        self.location = Some(location.label.clone());
        self.latitude = Some(location.latitude);
        self.longitude = Some(location.longitude);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_returns() {
        let (rent, roi) = estimate_returns(200_000, 2);
        assert_eq!(rent, 1050.0);
        assert_eq!(roi, 6.3);
    }

    #[test]
    fn test_estimate_returns_zero_price() {
        let (rent, roi) = estimate_returns(0, 0);
        assert_eq!(rent, 775.0);
        assert_eq!(roi, 0.0);
    }

    #[test]
    fn test_set_location_and_clear() {
        let mut filters = SearchFilters {
            min_price: Some(100_000),
            ..Default::default()
        };
        filters.set_location(&ResolvedLocation {
            latitude: 51.5,
            longitude: -0.14,
            label: "SW1A 1AA".to_string(),
            postcode: Some("SW1A 1AA".to_string()),
        });
        assert_eq!(filters.location.as_deref(), Some("SW1A 1AA"));
        assert_eq!(filters.latitude, Some(51.5));

        filters.clear();
        assert_eq!(filters, SearchFilters::default());
    }
}

use crate::config::EndpointsConfig;
use crate::listings::traits::{ListingQuery, ListingsProvider};
use crate::models::{estimate_returns, MappedProperty, Source};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, info, warn};

const SQ_FEET_PER_SQ_METRE: f64 = 10.7639;

/// Zoopla listings via RapidAPI
pub struct ZooplaClient {
    client: Client,
    base_url: String,
    host: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    listing: Vec<RawListing>,
}

/// Listing as returned by the API. Numbers arrive as either JSON numbers or strings.
#[derive(Debug, Deserialize)]
struct RawListing {
    #[serde(deserialize_with = "lenient_string")]
    listing_id: String,
    #[serde(default)]
    displayable_address: String,
    #[serde(default, deserialize_with = "lenient_number")]
    price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    num_bedrooms: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    num_bathrooms: Option<f64>,
    #[serde(default)]
    floor_area: Option<FloorArea>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    short_description: Option<String>,
    #[serde(default)]
    property_type: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    agent_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FloorArea {
    min_floor_area: Option<AreaValue>,
    max_floor_area: Option<AreaValue>,
}

#[derive(Debug, Deserialize)]
struct AreaValue {
    #[serde(default, deserialize_with = "lenient_number")]
    value: Option<f64>,
    #[serde(default)]
    units: String,
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.replace(',', "").trim().parse().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

impl FloorArea {
    fn square_feet(&self) -> Option<u32> {
        let area = self.max_floor_area.as_ref().or(self.min_floor_area.as_ref())?;
        let value = area.value?;
        let feet = match area.units.to_lowercase().as_str() {
            "sq_metres" | "sq_meters" | "sqm" => value * SQ_FEET_PER_SQ_METRE,
            _ => value,
        };
        Some(feet.round() as u32)
    }
}

impl RawListing {
    fn into_property(self) -> MappedProperty {
        let price = self.price.unwrap_or_default().round() as i64;
        let bedrooms = self.num_bedrooms.unwrap_or_default() as u32;
        let (estimated_monthly_rent, estimated_roi) = estimate_returns(price, bedrooms);
        let square_feet = self.floor_area.as_ref().and_then(FloorArea::square_feet);

        MappedProperty {
            id: self.listing_id,
            source: Source::Zoopla,
            address: self.displayable_address,
            price,
            bedrooms,
            bathrooms: self.num_bathrooms.map(|n| n as u32),
            square_feet,
            description: self
                .short_description
                .or(self.description)
                .unwrap_or_default(),
            property_type: self.property_type.unwrap_or_default(),
            image_url: self.image_url.filter(|u| !u.is_empty()),
            agent: self.agent_name.filter(|a| !a.is_empty()),
            estimated_monthly_rent,
            estimated_roi,
            latitude: self.latitude,
            longitude: self.longitude,
            fetched_at: Utc::now(),
        }
    }
}

fn map_listings(response: ListResponse) -> Vec<MappedProperty> {
    response
        .listing
        .into_iter()
        .filter(|raw| !raw.listing_id.is_empty())
        .map(RawListing::into_property)
        .collect()
}

impl ZooplaClient {
    pub fn new(endpoints: &EndpointsConfig) -> Result<Self> {
        let api_key = endpoints
            .listings_api_key
            .clone()
            .context("Listings API key is not configured")?;

        let client = Client::builder()
            .timeout(endpoints.timeout())
            .user_agent(&endpoints.user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: endpoints.listings_url.trim_end_matches('/').to_string(),
            host: endpoints.listings_host.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl ListingsProvider for ZooplaClient {
    async fn search(&self, query: &ListingQuery) -> Result<Vec<MappedProperty>> {
        info!("Searching Zoopla listings for '{}'", query.area);
        let url = format!("{}/properties/list", self.base_url);

        let mut params: Vec<(&str, String)> = vec![
            ("area", query.area.clone()),
            ("listing_status", "sale".to_string()),
            ("page_size", query.page_size.to_string()),
        ];
        if let Some(radius) = query.radius {
            params.push(("radius", radius.to_string()));
        }

        let response = self
            .client
            .get(&url)
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.host)
            .query(&params)
            .send()
            .await
            .context("Failed to fetch listings")?;

        if !response.status().is_success() {
            warn!("Listings API returned status: {}", response.status());
            anyhow::bail!("Listings API returned status: {}", response.status());
        }

        let body: ListResponse = response
            .json()
            .await
            .context("Failed to parse listings response")?;
        let properties = map_listings(body);
        debug!("Mapped {} listings", properties.len());
        Ok(properties)
    }

    fn source_name(&self) -> &'static str {
        "Zoopla"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_listing_with_string_numbers() {
        let json = r#"{
            "result_count": 1,
            "listing": [{
                "listing_id": "61234567",
                "displayable_address": "Deansgate, Manchester M3",
                "price": "250000",
                "num_bedrooms": "2",
                "num_bathrooms": "1",
                "floor_area": {"max_floor_area": {"value": "70", "units": "sq_metres"}},
                "description": "A long description",
                "short_description": "Two bed flat",
                "property_type": "Flat",
                "image_url": "https://lid.zoocdn.com/354/255/abc.jpg",
                "agent_name": "City Estates",
                "latitude": 53.4794,
                "longitude": -2.2489
            }]
        }"#;
        let response: ListResponse = serde_json::from_str(json).unwrap();
        let properties = map_listings(response);
        assert_eq!(properties.len(), 1);

        let p = &properties[0];
        assert_eq!(p.id, "61234567");
        assert_eq!(p.source, Source::Zoopla);
        assert_eq!(p.price, 250_000);
        assert_eq!(p.bedrooms, 2);
        assert_eq!(p.bathrooms, Some(1));
        assert_eq!(p.square_feet, Some(753));
        assert_eq!(p.description, "Two bed flat");
        assert_eq!(p.agent.as_deref(), Some("City Estates"));
        assert_eq!(p.estimated_monthly_rent, 1050.0);
        assert_eq!(p.estimated_roi, 5.0);
    }

    #[test]
    fn test_map_listing_sparse_fields() {
        let json = r#"{"listing": [
            {"listing_id": 42, "price": 125000, "image_url": ""},
            {"listing_id": null}
        ]}"#;
        let response: ListResponse = serde_json::from_str(json).unwrap();
        let properties = map_listings(response);
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].id, "42");
        assert_eq!(properties[0].bedrooms, 0);
        assert!(properties[0].bathrooms.is_none());
        assert!(properties[0].square_feet.is_none());
        assert!(properties[0].image_url.is_none());
    }

    #[test]
    fn test_missing_listing_array() {
        let response: ListResponse = serde_json::from_str(r#"{"error_string": "Unknown area"}"#).unwrap();
        assert!(map_listings(response).is_empty());
    }

    #[test]
    fn test_requires_api_key() {
        let endpoints = EndpointsConfig::default();
        let err = ZooplaClient::new(&endpoints).err().unwrap();
        assert!(err.to_string().contains("API key"));
    }
}

use crate::config::EndpointsConfig;
use crate::geo::traits::{GeocodeHit, Geocoder};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// OpenStreetMap Nominatim forward geocoder
pub struct NominatimClient {
    client: Client,
    base_url: String,
}

/// Raw search hit; Nominatim encodes coordinates as strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
}

impl NominatimClient {
    pub fn new(endpoints: &EndpointsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(endpoints.timeout())
            .user_agent(&endpoints.user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: endpoints.nominatim_url.trim_end_matches('/').to_string(),
        })
    }
}

fn parse_places(places: Vec<NominatimPlace>) -> Vec<GeocodeHit> {
    places
        .into_iter()
        .filter_map(|place| {
            let latitude = place.lat.parse().ok();
            let longitude = place.lon.parse().ok();
            match (latitude, longitude) {
                (Some(latitude), Some(longitude)) => Some(GeocodeHit {
                    display_name: place.display_name,
                    latitude,
                    longitude,
                }),
                _ => {
                    warn!("Skipping place with bad coordinates: {}", place.display_name);
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeocodeHit>> {
        let url = format!("{}/search", self.base_url);
        debug!("Geocoding '{}' (limit {})", query, limit);
        let limit = limit.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("countrycodes", "gb"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .context("Failed to reach geocoding service")?;

        if !response.status().is_success() {
            anyhow::bail!("Geocoding service returned status: {}", response.status());
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .context("Failed to parse geocoding response")?;

        Ok(parse_places(places))
    }
}

use crate::config::EndpointsConfig;
use crate::geo::traits::{PostcodeLookup, PostcodeRecord};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// postcodes.io client for exact and reverse postcode lookups
pub struct PostcodesClient {
    client: Client,
    base_url: String,
}

/// Envelope used by every postcodes.io endpoint
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: u16,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct PostcodeResult {
    postcode: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    parish: Option<String>,
    admin_district: Option<String>,
    admin_county: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NearbyPostcode {
    postcode: String,
}

impl PostcodesClient {
    pub fn new(endpoints: &EndpointsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(endpoints.timeout())
            .user_agent(&endpoints.user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: endpoints.postcodes_url.trim_end_matches('/').to_string(),
        })
    }
}

fn into_record(envelope: Envelope<PostcodeResult>) -> Option<PostcodeRecord> {
    if envelope.status != 200 {
        return None;
    }
    let result = envelope.result?;
    Some(PostcodeRecord {
        postcode: result.postcode,
        latitude: result.latitude?,
        longitude: result.longitude?,
        parish: result.parish,
        admin_district: result.admin_district,
        admin_county: result.admin_county,
        country: result.country,
    })
}

fn nearest_of(envelope: Envelope<Vec<NearbyPostcode>>) -> Option<String> {
    if envelope.status != 200 {
        return None;
    }
    envelope.result?.into_iter().next().map(|p| p.postcode)
}

#[async_trait]
impl PostcodeLookup for PostcodesClient {
    async fn lookup(&self, postcode: &str) -> Result<Option<PostcodeRecord>> {
        let compact: String = postcode.chars().filter(|c| !c.is_whitespace()).collect();
        let url = format!("{}/postcodes/{}", self.base_url, compact);
        debug!("Looking up postcode {}", compact);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach postcode service")?;

        if !response.status().is_success() {
            debug!("Postcode service returned status: {}", response.status());
            return Ok(None);
        }

        let envelope: Envelope<PostcodeResult> = response
            .json()
            .await
            .context("Failed to parse postcode response")?;
        Ok(into_record(envelope))
    }

    async fn nearest(&self, latitude: f64, longitude: f64) -> Result<Option<String>> {
        let url = format!("{}/postcodes", self.base_url);
        debug!("Reverse lookup for {}, {}", latitude, longitude);

        let response = self
            .client
            .get(&url)
            .query(&[("lon", longitude), ("lat", latitude)])
            .send()
            .await
            .context("Failed to reach postcode service")?;

        if !response.status().is_success() {
            anyhow::bail!("Postcode service returned status: {}", response.status());
        }

        let envelope: Envelope<Vec<NearbyPostcode>> = response
            .json()
            .await
            .context("Failed to parse reverse postcode response")?;
        Ok(nearest_of(envelope))
    }
}

//! In-memory stand-ins for the external services, shared by unit tests.

use crate::geo::{normalize_postcode, GeocodeHit, Geocoder, PostcodeLookup, PostcodeRecord};
use crate::listings::{ListingQuery, ListingsProvider};
use crate::models::{estimate_returns, MappedProperty, Source};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub struct FakeGeocoder {
    places: HashMap<String, Vec<GeocodeHit>>,
    delays: HashMap<String, Duration>,
    fail: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn with_place(mut self, query: &str, display_name: &str, latitude: f64, longitude: f64) -> Self {
        self.places.entry(query.to_string()).or_default().push(GeocodeHit {
            display_name: display_name.to_string(),
            latitude,
            longitude,
        });
        self
    }

    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeocodeHit>> {
        self.calls.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail {
            anyhow::bail!("geocoder unavailable");
        }
        let mut hits = self.places.get(query).cloned().unwrap_or_default();
        hits.truncate(limit);
        Ok(hits)
    }
}

#[derive(Default)]
pub struct FakePostcodes {
    records: HashMap<String, PostcodeRecord>,
    nearest: Option<String>,
    fail: bool,
    calls: Mutex<Vec<String>>,
}

impl FakePostcodes {
    pub fn with_record(mut self, record: PostcodeRecord) -> Self {
        self.records.insert(normalize_postcode(&record.postcode), record);
        self
    }

    pub fn with_nearest(mut self, postcode: &str) -> Self {
        self.nearest = Some(postcode.to_string());
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PostcodeLookup for FakePostcodes {
    async fn lookup(&self, postcode: &str) -> Result<Option<PostcodeRecord>> {
        self.calls.lock().unwrap().push(format!("lookup:{postcode}"));
        if self.fail {
            anyhow::bail!("postcode service unavailable");
        }
        Ok(self.records.get(&normalize_postcode(postcode)).cloned())
    }

    async fn nearest(&self, latitude: f64, longitude: f64) -> Result<Option<String>> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("nearest:{latitude},{longitude}"));
        if self.fail {
            anyhow::bail!("postcode service unavailable");
        }
        Ok(self.nearest.clone())
    }
}

#[derive(Default)]
pub struct FakeListings {
    properties: Vec<MappedProperty>,
    delay: Option<Duration>,
    fail: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl FakeListings {
    pub fn with_properties(properties: Vec<MappedProperty>) -> Self {
        Self {
            properties,
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ListingsProvider for FakeListings {
    async fn search(&self, query: &ListingQuery) -> Result<Vec<MappedProperty>> {
        self.calls.lock().unwrap().push(query.area.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("listings API returned status: 503 Service Unavailable");
        }
        Ok(self.properties.clone())
    }

    fn source_name(&self) -> &'static str {
        "Fake"
    }
}

pub fn property(id: &str, property_type: &str, price: i64, bedrooms: u32) -> MappedProperty {
    let (estimated_monthly_rent, estimated_roi) = estimate_returns(price, bedrooms);
    MappedProperty {
        id: id.to_string(),
        source: Source::Mock,
        address: format!("{id} Test Street"),
        price,
        bedrooms,
        bathrooms: Some(1),
        square_feet: Some(750),
        description: String::new(),
        property_type: property_type.to_string(),
        image_url: None,
        agent: None,
        estimated_monthly_rent,
        estimated_roi,
        latitude: None,
        longitude: None,
        fetched_at: Utc::now(),
    }
}

use anyhow::Result;
use async_trait::async_trait;
use property_scout::geo::{GeocodeHit, Geocoder, PostcodeLookup, PostcodeRecord};
use property_scout::location::{LocalStorage, LocationResolver, RecentLocations};
use property_scout::search::SearchOrchestrator;
use property_scout::{Config, ScoutSession};
use property_scout::listings::MockListings;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Geocoder and postcode service backed by fixed tables
#[derive(Default)]
pub struct Gazetteer {
    pub places: HashMap<String, GeocodeHit>,
    pub postcodes: HashMap<String, PostcodeRecord>,
    pub nearest: Option<String>,
    pub calls: Mutex<Vec<String>>,
}

impl Gazetteer {
    pub fn uk() -> Self {
        let mut gazetteer = Self::default();
        gazetteer.places.insert(
            "Leeds".into(),
            GeocodeHit {
                display_name: "Leeds, West Yorkshire, England, United Kingdom".into(),
                latitude: 53.7965,
                longitude: -1.5478,
            },
        );
        gazetteer.postcodes.insert(
            "LS1 4AP".into(),
            PostcodeRecord {
                postcode: "LS1 4AP".into(),
                latitude: 53.7971,
                longitude: -1.5486,
                admin_district: Some("Leeds".into()),
                country: Some("England".into()),
                ..Default::default()
            },
        );
        gazetteer.nearest = Some("LS1 4AP".into());
        gazetteer
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for Gazetteer {
    async fn search(&self, query: &str, _limit: usize) -> Result<Vec<GeocodeHit>> {
        self.calls.lock().unwrap().push(format!("search:{query}"));
        Ok(self.places.get(query).cloned().into_iter().collect())
    }
}

#[async_trait]
impl PostcodeLookup for Gazetteer {
    async fn lookup(&self, postcode: &str) -> Result<Option<PostcodeRecord>> {
        self.calls.lock().unwrap().push(format!("lookup:{postcode}"));
        Ok(self.postcodes.get(postcode).cloned())
    }

    async fn nearest(&self, _latitude: f64, _longitude: f64) -> Result<Option<String>> {
        self.calls.lock().unwrap().push("nearest".into());
        Ok(self.nearest.clone())
    }
}

/// Session over the fixed gazetteer and the mock listings source
pub async fn session(gazetteer: Arc<Gazetteer>, storage: &Path, config: &Config) -> ScoutSession {
    let resolver = LocationResolver::new(gazetteer.clone(), gazetteer);
    let orchestrator = SearchOrchestrator::new(Arc::new(MockListings::new()), config.search.clone());
    let recent = RecentLocations::load(LocalStorage::open(storage).await);
    ScoutSession::new(resolver, orchestrator, recent)
}

use crate::geo::{is_uk_postcode, normalize_postcode, Geocoder, PostcodeLookup, PostcodeRecord};
use crate::models::ResolvedLocation;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of resolving free text to a location
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Resolved(ResolvedLocation),
    NotFound,
    TransientError(String),
}

impl Resolution {
    pub fn location(&self) -> Option<&ResolvedLocation> {
        match self {
            Resolution::Resolved(location) => Some(location),
            _ => None,
        }
    }
}

/// Turns a postcode or place name into coordinates and a canonical label.
///
/// Postcode-shaped input goes to the postcode service first; anything else,
/// or a postcode the service does not know, goes to the place geocoder and is
/// then snapped to the nearest postcode for a stable label.
#[derive(Clone)]
pub struct LocationResolver {
    geocoder: Arc<dyn Geocoder>,
    postcodes: Arc<dyn PostcodeLookup>,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, postcodes: Arc<dyn PostcodeLookup>) -> Self {
        Self {
            geocoder,
            postcodes,
        }
    }

    pub async fn resolve(&self, input: &str) -> Resolution {
        let term = input.trim();
        if term.is_empty() {
            return Resolution::NotFound;
        }

        if is_uk_postcode(term) {
            match self.postcodes.lookup(&normalize_postcode(term)).await {
                Ok(Some(record)) => {
                    let location = from_postcode_record(record, term);
                    info!("Resolved postcode '{}' -> {}", term, location.label);
                    return Resolution::Resolved(location);
                }
                Ok(None) => debug!("Postcode '{}' unknown, trying place search", term),
                Err(e) => warn!("Postcode lookup for '{}' failed: {:#}", term, e),
            }
        }

        let hit = match self.geocoder.search(term, 1).await {
            Ok(hits) => match hits.into_iter().next() {
                Some(hit) => hit,
                None => {
                    info!("No place found for '{}'", term);
                    return Resolution::NotFound;
                }
            },
            Err(e) => {
                warn!("Place search for '{}' failed: {:#}", term, e);
                return Resolution::TransientError(format!("{e:#}"));
            }
        };

        let display_name = shorten_display_name(&hit.display_name);
        let postcode = match self.postcodes.nearest(hit.latitude, hit.longitude).await {
            Ok(postcode) => postcode,
            Err(e) => {
                warn!("Reverse postcode lookup failed, keeping place name: {:#}", e);
                None
            }
        };
        let label = postcode.clone().unwrap_or(display_name);
        info!("Resolved place '{}' -> {}", term, label);

        Resolution::Resolved(ResolvedLocation {
            latitude: hit.latitude,
            longitude: hit.longitude,
            label,
            postcode,
        })
    }
}

fn from_postcode_record(record: PostcodeRecord, input: &str) -> ResolvedLocation {
    let label = [
        &record.parish,
        &record.admin_district,
        &record.admin_county,
        &record.country,
    ]
    .into_iter()
    .flatten()
    .map(|s| s.trim())
    .find(|s| !s.is_empty())
    .unwrap_or(input)
    .to_string();

    ResolvedLocation {
        latitude: record.latitude,
        longitude: record.longitude,
        label,
        postcode: Some(record.postcode),
    }
}

/// First two comma-separated segments of a geocoder display name
pub fn shorten_display_name(display_name: &str) -> String {
    display_name
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(2)
        .collect::<Vec<_>>()
        .join(", ")
}

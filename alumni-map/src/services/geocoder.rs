//! Geocoder adapter
//!
//! Resolves a free-text place name to coordinates. Every failure mode
//! (timeout, transport error, bad status, unparsable body, no match) collapses
//! to `None`; callers substitute [`Coordinates::UNRESOLVED`].

use alumni_common::config::GeocoderConfig;
use alumni_common::{Coordinates, Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

/// Location lookup service
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Coordinates of the best match, or `None` if the place is not found
    async fn resolve(&self, location: &str) -> Option<Coordinates>;
}

/// Resolve `location`, falling back to the unresolved sentinel
pub async fn resolve_or_sentinel(geocoder: &dyn Geocoder, location: &str) -> Coordinates {
    match geocoder.resolve(location).await {
        Some(coordinates) => coordinates,
        None => {
            debug!(location = %location, "Location not resolved, using sentinel coordinates");
            Coordinates::UNRESOLVED
        }
    }
}

/// Single entry of a Nominatim search response
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Nominatim (OpenStreetMap) search API client
pub struct NominatimGeocoder {
    http_client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build geocoder HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
        })
    }

    async fn lookup(&self, location: &str) -> std::result::Result<Option<Coordinates>, String> {
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("q", location), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        let places: Vec<NominatimPlace> = response.json().await.map_err(|e| e.to_string())?;
        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let latitude = place.lat.parse::<f64>().map_err(|e| e.to_string())?;
        let longitude = place.lon.parse::<f64>().map_err(|e| e.to_string())?;
        Ok(Some(Coordinates::new(latitude, longitude)))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, location: &str) -> Option<Coordinates> {
        let location = location.trim();
        if location.is_empty() {
            return None;
        }

        match self.lookup(location).await {
            Ok(Some(coordinates)) => {
                debug!(
                    location = %location,
                    latitude = coordinates.latitude,
                    longitude = coordinates.longitude,
                    "Geocoded location"
                );
                Some(coordinates)
            }
            Ok(None) => {
                debug!(location = %location, "No geocoding match");
                None
            }
            Err(e) => {
                warn!(location = %location, error = %e, "Geocoding request failed");
                None
            }
        }
    }
}

//! Real location capabilities for the terminal screen: an IP-geolocation
//! endpoint stands in for the device position fix and Nominatim
//! (OpenStreetMap) does the reverse geocoding, free and keyless. Permission
//! is a configuration gate, the closest thing a terminal app has to a
//! foreground-location prompt.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::LocationError;
use crate::location::{LocationService, Place};
use crate::model::Coordinates;

const POSITION_URL: &str = "http://ip-api.com/json";
const GEOCODE_URL: &str = "https://nominatim.openstreetmap.org/reverse";
const REQUEST_TIMEOUT_SECS: u64 = 10;
// Nominatim rejects requests without an identifying user agent.
const USER_AGENT: &str = "skycast/0.1 (terminal weather screen)";

#[derive(Debug, Clone)]
pub struct SystemLocationService {
    http: Client,
    enabled: bool,
    position_url: String,
    geocode_url: String,
}

impl SystemLocationService {
    pub fn new(enabled: bool) -> Result<Self, LocationError> {
        Self::with_endpoints(enabled, POSITION_URL, GEOCODE_URL)
    }

    /// Endpoint overrides; used by tests.
    pub fn with_endpoints(
        enabled: bool,
        position_url: impl Into<String>,
        geocode_url: impl Into<String>,
    ) -> Result<Self, LocationError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LocationError::PositionUnavailable(e.to_string()))?;

        Ok(Self {
            http,
            enabled,
            position_url: position_url.into(),
            geocode_url: geocode_url.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    county: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

#[async_trait]
impl LocationService for SystemLocationService {
    async fn request_permission(&self) -> bool {
        self.enabled
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        let url = format!("{}?fields=status,lat,lon", self.position_url);

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| LocationError::PositionUnavailable(e.to_string()))?;

        let body: IpApiResponse = res
            .json()
            .await
            .map_err(|e| LocationError::PositionUnavailable(e.to_string()))?;

        if body.status != "success" {
            return Err(LocationError::PositionUnavailable(format!(
                "lookup status {}",
                body.status
            )));
        }

        match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            _ => Err(LocationError::PositionUnavailable(
                "lookup returned no coordinates".to_string(),
            )),
        }
    }

    async fn reverse_geocode(
        &self,
        position: Coordinates,
    ) -> Result<Vec<Place>, LocationError> {
        let url = format!(
            "{}?lat={}&lon={}&format=json&addressdetails=1&zoom=10",
            self.geocode_url, position.latitude, position.longitude
        );

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| LocationError::GeocodeFailed(e.to_string()))?;

        if !res.status().is_success() {
            return Err(LocationError::GeocodeFailed(format!(
                "status {}",
                res.status()
            )));
        }

        let body: NominatimResponse = res
            .json()
            .await
            .map_err(|e| LocationError::GeocodeFailed(e.to_string()))?;

        let Some(addr) = body.address else {
            return Ok(Vec::new());
        };

        Ok(vec![Place {
            city: addr.city.or(addr.town).or(addr.village).or(addr.municipality),
            subregion: addr.county.or(addr.state),
            country: addr.country,
        }])
    }
}

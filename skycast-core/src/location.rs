//! Location resolution: permission gate, position lookup, reverse geocoding.
//!
//! The resolver never fails outright. Denied permission and position errors
//! fall back to the configured place name with no coordinates; geocoding
//! problems fall back to a coordinate label.

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::error::LocationError;
use crate::model::{Coordinates, LocationResult};

pub mod system;

/// One reverse-geocode candidate. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Place {
    pub city: Option<String>,
    pub subregion: Option<String>,
    pub country: Option<String>,
}

/// Device-side location capabilities consumed by the resolver.
#[async_trait]
pub trait LocationService: Send + Sync + Debug {
    /// Ask for foreground location access. `false` means denied.
    async fn request_permission(&self) -> bool;

    /// Current position at balanced accuracy. May fail on its own even when
    /// permission was granted.
    async fn current_position(&self) -> Result<Coordinates, LocationError>;

    /// Candidates for a human-readable name of the position; may be empty.
    async fn reverse_geocode(&self, position: Coordinates)
    -> Result<Vec<Place>, LocationError>;
}

#[derive(Debug, Clone)]
pub struct LocationResolver {
    service: Arc<dyn LocationService>,
    fallback_place: String,
}

impl LocationResolver {
    pub fn new(service: Arc<dyn LocationService>, fallback_place: impl Into<String>) -> Self {
        Self {
            service,
            fallback_place: fallback_place.into(),
        }
    }

    pub fn fallback_place(&self) -> &str {
        &self.fallback_place
    }

    /// Runs the full resolution pass: permission, position, reverse geocode.
    pub async fn resolve(&self) -> LocationResult {
        if !self.service.request_permission().await {
            tracing::warn!(
                "location permission denied, using {}",
                self.fallback_place
            );
            return LocationResult::fallback(self.fallback_place.clone(), false);
        }

        let position = match self.service.current_position().await {
            Ok(position) => position,
            Err(e) => {
                tracing::warn!("could not determine current position: {e}");
                return LocationResult::fallback(self.fallback_place.clone(), true);
            }
        };

        let display_name = match self.service.reverse_geocode(position).await {
            Ok(places) => match places.first() {
                Some(place) => place_label(place),
                None => coordinate_label(position),
            },
            Err(e) => {
                // Recovered silently; the coordinates still identify the spot.
                tracing::debug!("reverse geocode failed: {e}");
                coordinate_label(position)
            }
        };

        tracing::info!(%display_name, "resolved location");
        LocationResult {
            coordinates: Some(position),
            display_name,
            permission_granted: true,
        }
    }
}

fn place_label(place: &Place) -> String {
    let locality = place
        .city
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| place.subregion.as_deref().filter(|s| !s.is_empty()))
        .unwrap_or("Unknown");
    let country = place
        .country
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or("Unknown");

    format!("{locality}, {country}")
}

/// Coordinate fallback label. The hemisphere suffixes are fixed regardless
/// of sign, matching the screen's historical output.
fn coordinate_label(position: Coordinates) -> String {
    format!("{:.2}°N {:.2}°E", position.latitude, position.longitude)
}

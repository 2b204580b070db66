use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Geographic point in signed degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Outcome of one location resolution pass.
///
/// `display_name` is never empty: every path, including the failure paths,
/// sets it together with (or before) `coordinates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    pub coordinates: Option<Coordinates>,
    pub display_name: String,
    pub permission_granted: bool,
}

impl LocationResult {
    /// Result for the paths where no position could be obtained.
    pub fn fallback(place: impl Into<String>, permission_granted: bool) -> Self {
        Self {
            coordinates: None,
            display_name: place.into(),
            permission_granted,
        }
    }
}

/// One normalized current-conditions reading. All fields come from a single
/// provider response; there is no partial construction. The only constructor
/// is [`WeatherReading::from_payload`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Location-local timestamp: provider time shifted by the UTC offset for
    /// the queried point.
    pub observed_at: NaiveDateTime,
    pub temperature_c: f64,
    pub apparent_temperature_c: f64,
    pub is_daytime: bool,
    pub precipitation_mm: f64,
    pub rain_mm: f64,
    pub surface_pressure_hpa: f64,
    pub wind_speed_kmh: f64,
    pub wind_direction_deg: f64,
    pub uv_index: f64,
    pub visibility_m: f64,
    pub timezone_id: String,
    pub timezone_abbreviation: String,
    pub utc_offset_seconds: i64,
}

/// Estimated sunrise/sunset for the current calendar day. Derived from the
/// month alone, so display-only; see [`crate::astronomy`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedAstronomy {
    pub sunrise: NaiveDateTime,
    pub sunset: NaiveDateTime,
}

/// A single-button acknowledgement dialog for the view to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAlert {
    pub title: String,
    pub message: String,
}

impl UserAlert {
    pub fn permission_denied() -> Self {
        Self {
            title: "Permission Denied".to_string(),
            message: "Permission to access location was denied. Using default location."
                .to_string(),
        }
    }

    pub fn location_error() -> Self {
        Self {
            title: "Location Error".to_string(),
            message: "Could not get your location. Using default location.".to_string(),
        }
    }
}

/// Everything the view layer consumes. Owned by the screen controller and
/// replaced wholesale on every refresh cycle; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenState {
    pub location: LocationResult,
    pub weather: Option<WeatherReading>,
    pub astronomy: Option<DerivedAstronomy>,
    pub loading: bool,
    pub alert: Option<UserAlert>,
}

impl ScreenState {
    /// State at screen mount: nothing fetched, nothing loading yet.
    pub fn empty(initial_place: impl Into<String>) -> Self {
        Self {
            location: LocationResult {
                coordinates: None,
                display_name: initial_place.into(),
                permission_granted: true,
            },
            weather: None,
            astronomy: None,
            loading: false,
            alert: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_state_still_has_a_display_name() {
        let state = ScreenState::empty("Getting location...");
        assert!(!state.location.display_name.is_empty());
        assert!(state.weather.is_none());
        assert!(state.astronomy.is_none());
        assert!(!state.loading);
    }

    #[test]
    fn fallback_result_has_no_coordinates() {
        let result = LocationResult::fallback("Berlin, Germany", false);
        assert!(result.coordinates.is_none());
        assert_eq!(result.display_name, "Berlin, Germany");
        assert!(!result.permission_granted);
    }
}

//! Normalizes provider payloads into [`WeatherReading`] and owns the
//! coordinate resolution order for a fetch.

use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

use crate::error::WeatherError;
use crate::model::{Coordinates, WeatherReading};
use crate::transport::{CURRENT_VARIABLES, WeatherTransport};

/// Coordinates actually sent to the provider: explicit argument first, then
/// the last resolved location, then the configured default.
pub fn resolve_target(
    explicit: Option<Coordinates>,
    last_known: Option<Coordinates>,
    default: Coordinates,
) -> Coordinates {
    explicit.or(last_known).unwrap_or(default)
}

#[derive(Debug)]
pub struct WeatherFetcher {
    transport: Box<dyn WeatherTransport>,
}

impl WeatherFetcher {
    pub fn new(transport: Box<dyn WeatherTransport>) -> Self {
        Self { transport }
    }

    /// One request, one reading. Any network or decode failure is returned
    /// to the caller untouched; there are no retries here.
    pub async fn fetch(&self, target: Coordinates) -> Result<WeatherReading, WeatherError> {
        let payload = self
            .transport
            .fetch_current(target.latitude, target.longitude)
            .await?;

        WeatherReading::from_payload(&payload)
    }
}

impl WeatherReading {
    /// The single validating constructor. Fields are looked up by variable
    /// name and checked against the requested list before any value is read,
    /// so a provider reordering its response cannot silently misalign values
    /// and an omitted variable names itself in the error.
    pub fn from_payload(payload: &Value) -> Result<Self, WeatherError> {
        let utc_offset_seconds = payload
            .get("utc_offset_seconds")
            .and_then(Value::as_i64)
            .ok_or_else(|| WeatherError::MissingField("utc_offset_seconds".to_string()))?;

        let timezone_id = text_field(payload, "timezone")?;
        let timezone_abbreviation = text_field(payload, "timezone_abbreviation")?;

        let current = payload
            .get("current")
            .and_then(Value::as_object)
            .ok_or_else(|| WeatherError::MissingField("current".to_string()))?;

        for name in CURRENT_VARIABLES {
            if !current.contains_key(name) {
                return Err(WeatherError::MissingField(name.to_string()));
            }
        }

        let time = current
            .get("time")
            .ok_or_else(|| WeatherError::MissingField("time".to_string()))?;
        let observed_at = local_timestamp(provider_time(time)?, utc_offset_seconds)?;

        let number = |name: &str| -> Result<f64, WeatherError> {
            current
                .get(name)
                .and_then(Value::as_f64)
                .ok_or_else(|| WeatherError::MissingField(name.to_string()))
        };

        Ok(Self {
            observed_at,
            temperature_c: number("temperature_2m")?,
            apparent_temperature_c: number("apparent_temperature")?,
            is_daytime: number("is_day")? != 0.0,
            precipitation_mm: number("precipitation")?,
            rain_mm: number("rain")?,
            surface_pressure_hpa: number("surface_pressure")?,
            wind_speed_kmh: number("wind_speed_10m")?,
            wind_direction_deg: number("wind_direction_10m")?,
            uv_index: number("uv_index")?,
            visibility_m: number("visibility")?,
            timezone_id,
            timezone_abbreviation,
            utc_offset_seconds,
        })
    }
}

fn text_field(payload: &Value, name: &str) -> Result<String, WeatherError> {
    payload
        .get(name)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| WeatherError::MissingField(name.to_string()))
}

/// Provider time as epoch seconds UTC. The endpoint is asked for `unixtime`,
/// but an ISO-like local string is accepted as well and read as naive UTC.
fn provider_time(value: &Value) -> Result<i64, WeatherError> {
    if let Some(n) = value.as_i64() {
        return Ok(n);
    }
    if let Some(f) = value.as_f64() {
        return Ok(f as i64);
    }
    if let Some(s) = value.as_str() {
        for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(parsed.and_utc().timestamp());
            }
        }
        return Err(WeatherError::InvalidTime(s.to_string()));
    }

    Err(WeatherError::InvalidTime(value.to_string()))
}

/// Device UTC time shifted by the provider's offset for the queried point.
fn local_timestamp(epoch: i64, offset_seconds: i64) -> Result<NaiveDateTime, WeatherError> {
    DateTime::from_timestamp(epoch + offset_seconds, 0)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| {
            WeatherError::InvalidTime(format!("{epoch} + {offset_seconds}s is out of range"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "latitude": 52.52,
            "longitude": 13.41,
            "elevation": 38.0,
            "timezone": "Europe/Berlin",
            "timezone_abbreviation": "CEST",
            "utc_offset_seconds": 7200,
            "current": {
                "time": 1_700_000_000_i64,
                "interval": 900,
                "rain": 0.1,
                "precipitation": 0.2,
                "temperature_2m": 21.4,
                "is_day": 1,
                "apparent_temperature": 19.9,
                "surface_pressure": 1013.6,
                "wind_speed_10m": 11.2,
                "wind_direction_10m": 245.0,
                "uv_index": 3.2,
                "visibility": 24140.0
            }
        })
    }

    #[test]
    fn decodes_all_fields_by_name() {
        let reading = WeatherReading::from_payload(&sample_payload()).expect("decode");

        assert_eq!(reading.temperature_c, 21.4);
        assert_eq!(reading.apparent_temperature_c, 19.9);
        assert!(reading.is_daytime);
        assert_eq!(reading.precipitation_mm, 0.2);
        assert_eq!(reading.rain_mm, 0.1);
        assert_eq!(reading.surface_pressure_hpa, 1013.6);
        assert_eq!(reading.wind_speed_kmh, 11.2);
        assert_eq!(reading.wind_direction_deg, 245.0);
        assert_eq!(reading.uv_index, 3.2);
        assert_eq!(reading.visibility_m, 24140.0);
        assert_eq!(reading.timezone_id, "Europe/Berlin");
        assert_eq!(reading.timezone_abbreviation, "CEST");
        assert_eq!(reading.utc_offset_seconds, 7200);
    }

    #[test]
    fn observed_at_is_provider_time_plus_offset() {
        let mut payload = sample_payload();
        payload["utc_offset_seconds"] = json!(-10800);
        payload["current"]["time"] = json!(1_700_000_000_i64);

        let reading = WeatherReading::from_payload(&payload).expect("decode");

        assert_eq!(reading.observed_at.and_utc().timestamp(), 1_699_989_200);
    }

    #[test]
    fn iso_time_strings_are_accepted() {
        let mut payload = sample_payload();
        payload["utc_offset_seconds"] = json!(0);
        payload["current"]["time"] = json!("2023-11-14T22:13");

        let reading = WeatherReading::from_payload(&payload).expect("decode");

        // 2023-11-14T22:13:00Z
        assert_eq!(reading.observed_at.and_utc().timestamp(), 1_699_999_980);
    }

    #[test]
    fn unreadable_time_is_an_invalid_time_error() {
        let mut payload = sample_payload();
        payload["current"]["time"] = json!("eventually");

        let err = WeatherReading::from_payload(&payload).unwrap_err();
        assert!(matches!(err, WeatherError::InvalidTime(_)));
    }

    #[test]
    fn missing_variable_fails_fast_naming_the_field() {
        let mut payload = sample_payload();
        payload["current"]
            .as_object_mut()
            .expect("current is an object")
            .remove("visibility");

        let err = WeatherReading::from_payload(&payload).unwrap_err();
        assert_eq!(
            err.to_string(),
            "weather response is missing field `visibility`"
        );
    }

    #[test]
    fn missing_offset_fails_fast() {
        let mut payload = sample_payload();
        payload
            .as_object_mut()
            .expect("payload is an object")
            .remove("utc_offset_seconds");

        let err = WeatherReading::from_payload(&payload).unwrap_err();
        assert!(matches!(err, WeatherError::MissingField(f) if f == "utc_offset_seconds"));
    }

    #[test]
    fn night_readings_clear_the_daytime_flag() {
        let mut payload = sample_payload();
        payload["current"]["is_day"] = json!(0);

        let reading = WeatherReading::from_payload(&payload).expect("decode");
        assert!(!reading.is_daytime);
    }

    #[test]
    fn identical_payloads_decode_identically() {
        let payload = sample_payload();
        let first = WeatherReading::from_payload(&payload).expect("decode");
        let second = WeatherReading::from_payload(&payload).expect("decode");

        assert_eq!(first, second);
    }

    #[test]
    fn target_resolution_prefers_explicit_then_last_known_then_default() {
        let default = Coordinates {
            latitude: 52.52,
            longitude: 13.41,
        };
        let last_known = Coordinates {
            latitude: 48.43,
            longitude: -123.37,
        };
        let explicit = Coordinates {
            latitude: 35.68,
            longitude: 139.69,
        };

        assert_eq!(resolve_target(None, None, default), default);
        assert_eq!(resolve_target(None, Some(last_known), default), last_known);
        assert_eq!(
            resolve_target(Some(explicit), Some(last_known), default),
            explicit
        );
    }
}

use crate::error::WeatherError;
use crate::transport::{client::ClientTransport, raw::RawTransport};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod client;
pub mod raw;

/// Current-condition variables requested from the provider, in a fixed
/// order. Decoding is keyed by variable name, never by this order; the list
/// exists so requests stay stable and decode can fail fast when the provider
/// omits something.
pub const CURRENT_VARIABLES: [&str; 10] = [
    "rain",
    "precipitation",
    "temperature_2m",
    "is_day",
    "apparent_temperature",
    "surface_pressure",
    "wind_speed_10m",
    "wind_direction_10m",
    "uv_index",
    "visibility",
];

pub const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com";

pub(crate) const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportId {
    /// reqwest query builder, decoded straight from the response.
    Client,
    /// Hand-assembled URL, body read as text and parsed separately.
    Raw,
}

impl TransportId {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportId::Client => "client",
            TransportId::Raw => "raw",
        }
    }

    pub const fn all() -> &'static [TransportId] {
        &[TransportId::Client, TransportId::Raw]
    }
}

impl std::fmt::Display for TransportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TransportId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "client" => Ok(TransportId::Client),
            "raw" => Ok(TransportId::Raw),
            _ => Err(anyhow::anyhow!(
                "Unknown transport '{value}'. Supported transports: client, raw."
            )),
        }
    }
}

/// A way of getting raw current-conditions JSON for a point. The
/// implementations differ only in HTTP mechanics, not in what they return,
/// so the pipeline above them is written once.
#[async_trait]
pub trait WeatherTransport: Send + Sync + Debug {
    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<serde_json::Value, WeatherError>;
}

/// Construct a transport for an explicit id. No credentials are involved;
/// the provider is keyless.
pub fn transport_for(id: TransportId) -> Result<Box<dyn WeatherTransport>, WeatherError> {
    let boxed: Box<dyn WeatherTransport> = match id {
        TransportId::Client => Box::new(ClientTransport::new()?),
        TransportId::Raw => Box::new(RawTransport::new()?),
    };

    Ok(boxed)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    // Walk back to a char boundary so multibyte text cannot split mid-char.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_id_as_str_roundtrip() {
        for id in TransportId::all() {
            let s = id.as_str();
            let parsed = TransportId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn unknown_transport_error() {
        let err = TransportId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown transport"));
    }

    #[test]
    fn transport_for_builds_both() {
        for id in TransportId::all() {
            assert!(transport_for(*id).is_ok());
        }
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(500);
        let truncated = truncate_body(&body);
        assert!(truncated.len() < body.len());
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // Three-byte chars put byte 200 inside a character.
        let body = "€".repeat(100);
        let truncated = truncate_body(&body);

        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
        assert!(truncated.trim_end_matches("...").chars().all(|c| c == '€'));
    }
}

//! Transport that assembles the request URL by hand and parses the body from
//! text, checking the HTTP status itself.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::WeatherError;
use crate::transport::{
    CURRENT_VARIABLES, OPEN_METEO_BASE_URL, REQUEST_TIMEOUT_SECS, WeatherTransport, truncate_body,
};

#[derive(Debug, Clone)]
pub struct RawTransport {
    http: Client,
    base_url: String,
}

impl RawTransport {
    pub fn new() -> Result<Self, WeatherError> {
        Self::with_base_url(OPEN_METEO_BASE_URL)
    }

    /// Point the transport at a different host; used by tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl WeatherTransport for RawTransport {
    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<serde_json::Value, WeatherError> {
        let url = format!(
            "{}/v1/forecast?latitude={}&longitude={}&current={}&timezone=auto&timeformat=unixtime",
            self.base_url,
            latitude,
            longitude,
            CURRENT_VARIABLES.join(","),
        );

        let res = self.http.get(&url).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        tracing::debug!(latitude, longitude, "fetched current conditions (raw)");
        Ok(serde_json::from_str(&body)?)
    }
}

//! Transport backed by reqwest's query builder with direct JSON decoding.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::WeatherError;
use crate::transport::{
    CURRENT_VARIABLES, OPEN_METEO_BASE_URL, REQUEST_TIMEOUT_SECS, WeatherTransport, truncate_body,
};

#[derive(Debug, Clone)]
pub struct ClientTransport {
    http: Client,
    base_url: String,
}

impl ClientTransport {
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
impl WeatherTransport for ClientTransport {
    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<serde_json::Value, WeatherError> {
        let url = format!("{}/v1/forecast", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_VARIABLES.join(",")),
                ("timezone", "auto".to_string()),
                ("timeformat", "unixtime".to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(WeatherError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        tracing::debug!(latitude, longitude, "fetched current conditions (client)");
        Ok(res.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn sends_fixed_variable_list_and_auto_timezone() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "52.52"))
            .and(query_param("longitude", "13.41"))
            .and(query_param(
                "current",
                "rain,precipitation,temperature_2m,is_day,apparent_temperature,\
                 surface_pressure,wind_speed_10m,wind_direction_10m,uv_index,visibility",
            ))
            .and(query_param("timezone", "auto"))
            .and(query_param("timeformat", "unixtime"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = ClientTransport::with_base_url(server.uri()).expect("build transport");
        let value = transport.fetch_current(52.52, 13.41).await.expect("fetch");

        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let transport = ClientTransport::with_base_url(server.uri()).expect("build transport");
        let err = transport.fetch_current(52.52, 13.41).await.unwrap_err();

        match err {
            WeatherError::Status { status, body } => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }
}

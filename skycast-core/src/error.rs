use thiserror::Error;

/// Failures while resolving the device location. All of these are recovered
/// locally by the resolver; none aborts the pipeline.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("current position unavailable: {0}")]
    PositionUnavailable(String),
    #[error("reverse geocoding failed: {0}")]
    GeocodeFailed(String),
}

/// Failures while fetching or decoding a weather reading. The caller keeps
/// whatever reading it already has; there are no retries.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("weather request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to parse weather response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("weather response is missing field `{0}`")]
    MissingField(String),
    #[error("weather response carries an invalid time value: {0}")]
    InvalidTime(String),
}

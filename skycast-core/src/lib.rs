//! Core library for the `skycast` terminal weather screen.
//!
//! This crate defines:
//! - The screen's data model and error types
//! - Location resolution (permission gate, position fix, reverse geocoding)
//! - Interchangeable transports over the Open-Meteo current-conditions API
//! - The screen controller that sequences resolve → fetch → derive
//!
//! It is used by `skycast-cli`, but can also be reused by other frontends.

pub mod astronomy;
pub mod config;
pub mod controller;
pub mod error;
pub mod fetcher;
pub mod location;
pub mod model;
pub mod transport;

pub use config::Config;
pub use controller::{LOCATION_GRACE, Phase, ScreenController};
pub use error::{LocationError, WeatherError};
pub use fetcher::WeatherFetcher;
pub use location::{LocationResolver, LocationService, Place};
pub use model::{
    Coordinates, DerivedAstronomy, LocationResult, ScreenState, UserAlert, WeatherReading,
};
pub use transport::{TransportId, WeatherTransport};

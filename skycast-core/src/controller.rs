//! Screen orchestration: one resolve, one fetch, a grace timer, manual
//! refresh. The controller is long-lived for the screen's lifetime and owns
//! the [`ScreenState`] record the view reads.

use std::time::Duration;

use chrono::Local;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};

use crate::astronomy;
use crate::fetcher::{WeatherFetcher, resolve_target};
use crate::location::LocationResolver;
use crate::model::{Coordinates, LocationResult, ScreenState, UserAlert};

/// How long the screen waits for a location before fetching with defaults.
pub const LOCATION_GRACE: Duration = Duration::from_secs(3);

/// Where the screen is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Mounted, nothing requested yet.
    Idle,
    /// Location lookup in flight, or no fetch has succeeded yet.
    Resolving,
    /// Weather fetched for a resolved location.
    Ready,
    /// Weather fetched with the default coordinates after the grace period.
    Fallback,
}

pub struct ScreenController {
    resolver: LocationResolver,
    fetcher: WeatherFetcher,
    default_coordinates: Coordinates,
    grace: Duration,
    phase: Phase,
    state: ScreenState,
    last_known: Option<Coordinates>,
    pending_location: Option<JoinHandle<LocationResult>>,
}

impl ScreenController {
    pub fn new(
        resolver: LocationResolver,
        fetcher: WeatherFetcher,
        default_coordinates: Coordinates,
    ) -> Self {
        Self {
            resolver,
            fetcher,
            default_coordinates,
            grace: LOCATION_GRACE,
            phase: Phase::Idle,
            state: ScreenState::empty("Getting location..."),
            last_known: None,
            pending_location: None,
        }
    }

    /// Grace period override for tests; the screen always uses
    /// [`LOCATION_GRACE`].
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// First load. Resolves the location, racing a grace timer: whichever
    /// finishes first decides whether the fetch uses resolved or default
    /// coordinates. A resolution losing the race is parked so a late result
    /// can still update the displayed place name, but it never triggers a
    /// second automatic fetch.
    pub async fn mount(&mut self) {
        self.phase = Phase::Resolving;
        self.state.loading = true;

        let resolver = self.resolver.clone();
        let mut resolution = tokio::spawn(async move { resolver.resolve().await });
        let started = Instant::now();

        tokio::select! {
            outcome = &mut resolution => {
                let location = match outcome {
                    Ok(location) => location,
                    Err(e) => {
                        tracing::warn!("location task failed: {e}");
                        LocationResult::fallback(self.resolver.fallback_place().to_string(), true)
                    }
                };
                self.apply_location(&location);

                if location.coordinates.is_some() {
                    if self.fetch_and_store(location.coordinates).await {
                        self.phase = Phase::Ready;
                    }
                } else {
                    // The grace timer still governs the default fetch; a
                    // fast denial does not fetch before the grace deadline.
                    sleep(self.grace.saturating_sub(started.elapsed())).await;
                    if self.fetch_and_store(None).await {
                        self.phase = Phase::Fallback;
                    }
                }
            }
            _ = sleep(self.grace) => {
                self.pending_location = Some(resolution);
                if self.fetch_and_store(None).await {
                    self.phase = Phase::Fallback;
                }
            }
        }

        self.state.loading = false;
    }

    /// Manual refresh: resolve again, then fetch with whatever coordinates
    /// resulted. Ignored while a cycle is already in flight.
    pub async fn refresh(&mut self) {
        if self.state.loading {
            return;
        }
        self.state.loading = true;
        self.discard_pending_location();

        let location = self.resolver.resolve().await;
        let coordinates = location.coordinates;
        self.apply_location(&location);

        // A failed fetch keeps the previous reading, so the phase describing
        // that reading keeps holding too.
        if self.fetch_and_store(coordinates).await {
            self.phase = if coordinates.is_some() {
                Phase::Ready
            } else {
                Phase::Fallback
            };
        }
        self.state.loading = false;
    }

    /// Marks a cycle as in flight so tests can exercise the refresh guard.
    #[cfg(test)]
    fn mark_loading(&mut self) {
        self.state.loading = true;
    }

    /// Folds in a mount-time resolution that finished after the grace fetch.
    /// Updates the displayed location only; no second automatic fetch.
    pub async fn absorb_pending_location(&mut self) {
        let finished = self
            .pending_location
            .as_ref()
            .is_some_and(JoinHandle::is_finished);
        if !finished {
            return;
        }

        if let Some(handle) = self.pending_location.take() {
            match handle.await {
                Ok(location) => self.apply_location(&location),
                Err(e) => tracing::debug!("pending location task failed: {e}"),
            }
        }
    }

    pub fn has_pending_location(&self) -> bool {
        self.pending_location.is_some()
    }

    pub fn dismiss_alert(&mut self) {
        self.state.alert = None;
    }

    /// Teardown: stops the parked resolution so a late result cannot touch a
    /// discarded screen.
    pub fn unmount(&mut self) {
        self.discard_pending_location();
        self.phase = Phase::Idle;
    }

    fn discard_pending_location(&mut self) {
        if let Some(handle) = self.pending_location.take() {
            handle.abort();
        }
    }

    fn apply_location(&mut self, location: &LocationResult) {
        if !location.permission_granted {
            self.state.alert = Some(UserAlert::permission_denied());
        } else if location.coordinates.is_none() {
            self.state.alert = Some(UserAlert::location_error());
        }

        if let Some(coordinates) = location.coordinates {
            self.last_known = Some(coordinates);
        }
        self.state.location = location.clone();
    }

    /// Returns whether a fresh reading was stored.
    async fn fetch_and_store(&mut self, coordinates: Option<Coordinates>) -> bool {
        let target = resolve_target(coordinates, self.last_known, self.default_coordinates);

        match self.fetcher.fetch(target).await {
            Ok(reading) => {
                self.state.astronomy = Some(astronomy::estimate(Local::now().date_naive()));
                self.state.weather = Some(reading);
                true
            }
            Err(e) => {
                // Previous reading stays on screen; only the spinner stops.
                tracing::warn!("weather fetch failed: {e}");
                false
            }
        }
    }
}

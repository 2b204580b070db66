//! Display-only sunrise/sunset estimate.
//!
//! Not real astronomy: the estimate depends on the calendar month alone,
//! never on latitude, longitude, or the weather reading. April through
//! September count as the bright half of the year.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::model::DerivedAstronomy;

/// Estimate sunrise and sunset for the calendar day of `reference`.
pub fn estimate(reference: NaiveDate) -> DerivedAstronomy {
    let bright_half = (4..=9).contains(&reference.month());

    let sunrise_hour: f64 = if bright_half { 5.5 } else { 6.5 };
    let sunset_hour: u32 = if bright_half { 18 + 1 } else { 18 - 1 };

    DerivedAstronomy {
        sunrise: at(
            reference,
            sunrise_hour.floor() as u32,
            ((sunrise_hour % 1.0) * 60.0).round() as u32,
        ),
        sunset: at(reference, sunset_hour, 30),
    }
}

fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    // Hour and minute are fixed in-range constants, so this cannot miss.
    day.and_hms_opt(hour, minute, 0).unwrap_or_default()
}

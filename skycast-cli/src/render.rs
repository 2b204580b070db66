//! Text rendering of the screen state: place header, big temperature with
//! condition, then a details card.

use std::fmt::Write;

use skycast_core::controller::Phase;
use skycast_core::model::{ScreenState, WeatherReading};

pub fn screen_text(state: &ScreenState, phase: Phase) -> String {
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(out, "Today · {}", state.location.display_name);

    if let Some(alert) = &state.alert {
        let _ = writeln!(out, "! {}: {}", alert.title, alert.message);
    }

    let Some(weather) = &state.weather else {
        let suffix = if state.loading { ", loading" } else { "" };
        let _ = writeln!(out, "  --°  (no weather data{suffix})");
        return out;
    };

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {:.0}°  {}",
        weather.temperature_c.round(),
        condition_label(weather)
    );
    let _ = writeln!(
        out,
        "  Feels like {:.0}°",
        weather.apparent_temperature_c.round()
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  Visibility {:.1} km   Rain {} mm   Wind {:.0} km/h",
        weather.visibility_m / 1000.0,
        weather.rain_mm,
        weather.wind_speed_kmh.round()
    );
    let _ = writeln!(
        out,
        "  Pressure {:.0} hPa   Wind dir {:.0}°   UV {:.1}   Precip {} mm",
        weather.surface_pressure_hpa,
        weather.wind_direction_deg,
        weather.uv_index,
        weather.precipitation_mm
    );

    if let Some(astronomy) = &state.astronomy {
        let _ = writeln!(
            out,
            "  Sunrise {}   Sunset {}   (estimated)",
            astronomy.sunrise.format("%H:%M"),
            astronomy.sunset.format("%H:%M")
        );
    }

    let _ = writeln!(
        out,
        "  Observed {} {} ({})",
        weather.observed_at.format("%Y-%m-%d %H:%M"),
        weather.timezone_abbreviation,
        weather.timezone_id
    );

    if phase == Phase::Fallback {
        let _ = writeln!(out, "  Shown for the default location.");
    }

    out
}

// The screen never had condition codes; day/night is all it shows.
fn condition_label(weather: &WeatherReading) -> &'static str {
    if weather.is_daytime { "Sunny" } else { "Clear Night" }
}

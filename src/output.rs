use crate::error::Result;
use crate::models::{AgriculturalReport, CurrentSnapshot, DailyAggregate};
use serde::Serialize;
use std::fmt::Write;

/// Soil moisture below this is flagged in agricultural reports
const DRY_SOIL_THRESHOLD_PCT: f64 = 30.0;

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn render_daily(days: &[DailyAggregate]) -> String {
    let mut out = String::new();
    let with_soil = days.iter().any(|d| d.soil_moisture_pct.is_some());

    let _ = write!(
        out,
        "{:<10}  {:>9}  {:>4}  {:>5}  {:>5}  {:>4}",
        "Date", "Temp °C", "Hum%", "Rain%", "Wind", "UV"
    );
    if with_soil {
        let _ = write!(out, "  {:>5}", "Soil%");
    }
    let _ = writeln!(out, "  Conditions");

    for day in days {
        let temps = format!("{:.0}..{:.0}", day.temperature_min_c, day.temperature_max_c);
        let rain_flag = if day.rain_likely() { "*" } else { " " };
        let _ = write!(
            out,
            "{:<10}  {:>9}  {:>4.0}  {:>4.0}{}  {:>5.1}  {:>4.1}",
            day.date.to_string(),
            temps,
            day.humidity_pct,
            day.precipitation_probability_pct,
            rain_flag,
            day.wind_speed,
            day.uv_index,
        );
        if with_soil {
            match day.soil_moisture_pct {
                Some(m) => {
                    let _ = write!(out, "  {:>5.0}", m);
                }
                None => {
                    let _ = write!(out, "  {:>5}", "-");
                }
            }
        }
        let _ = writeln!(
            out,
            "  {} {} ({})",
            day.condition.symbol(),
            day.condition,
            day.description
        );
    }

    out
}

pub fn render_current(snapshot: &CurrentSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} ({})",
        snapshot.condition.symbol(),
        snapshot.condition,
        snapshot.description
    );
    let _ = writeln!(out, "  Temperature   {:.0} °C", snapshot.temperature_c);
    let _ = writeln!(out, "  Humidity      {:.0}%", snapshot.humidity_pct);
    let _ = writeln!(out, "  Wind          {:.1} m/s", snapshot.wind_speed);
    let _ = writeln!(out, "  Rain (1h)     {:.1} mm", snapshot.precipitation_mm);
    let _ = writeln!(out, "  UV index      {:.1} (est.)", snapshot.uv_index);
    if let Some(moisture) = snapshot.soil_moisture_pct {
        let _ = writeln!(out, "  Soil moisture {:.0}% (est.)", moisture);
    }
    let _ = writeln!(
        out,
        "  Observed      {}",
        snapshot.observed_at.format("%Y-%m-%d %H:%M UTC")
    );
    out
}

pub fn render_agricultural(report: &AgriculturalReport) -> String {
    let mut out = String::new();
    if let Some(ref current) = report.current {
        let _ = writeln!(out, "Now");
        out.push_str(&render_current(current));
        out.push('\n');
    }

    let _ = writeln!(out, "Daily outlook");
    out.push_str(&render_daily(&report.daily));

    let dry = report.dry_days(DRY_SOIL_THRESHOLD_PCT);
    if !dry.is_empty() {
        let dates: Vec<String> = dry.iter().map(|d| d.date.to_string()).collect();
        let _ = writeln!(
            out,
            "\nSoil below {:.0}% on: {}",
            DRY_SOIL_THRESHOLD_PCT,
            dates.join(", ")
        );
    }
    out
}

//! Weather source client.
//!
//! Live path hits OpenWeather's current-conditions endpoint. Without a key,
//! or on any provider failure, the client answers with a seasonal estimate
//! so a forecast is always produced.

use crate::config::ProviderConfig;
use crate::sources::types::{Provenance, WeatherReading};
use crate::timeslot::TimeContext;
use chrono::Local;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct OwmResponse {
    weather: Vec<OwmCondition>,
    main: OwmMain,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    list: Vec<OwmForecastSlot>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastSlot {
    weather: Vec<OwmCondition>,
    main: OwmMain,
    /// "2025-11-08 18:00:00"
    dt_txt: String,
}

pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(http: reqwest::Client, providers: &ProviderConfig) -> Self {
        Self {
            http,
            base_url: providers.openweather_base_url.clone(),
            api_key: providers.openweather_api_key.clone(),
        }
    }

    /// Live reading if possible, seasonal estimate otherwise. Target dates
    /// one to five days out go through the 3-hourly forecast endpoint;
    /// today (and anything out of forecast range) uses current conditions.
    pub async fn fetch(&self, lat: f64, lng: f64, ctx: &TimeContext) -> WeatherReading {
        if self.api_key.is_empty() {
            return seasonal_estimate(ctx);
        }
        let days_ahead = (ctx.date - Local::now().date_naive()).num_days();
        let attempt = if (1..=5).contains(&days_ahead) {
            self.fetch_forecast(lat, lng, ctx).await
        } else {
            self.fetch_current(lat, lng).await
        };
        match attempt {
            Ok(reading) => reading,
            Err(err) => {
                warn!(%err, "weather provider failed, using seasonal estimate");
                seasonal_estimate(ctx)
            }
        }
    }

    async fn fetch_current(&self, lat: f64, lng: f64) -> crate::error::Result<WeatherReading> {
        let url = format!("{}/weather", self.base_url);
        let resp: OwmResponse = self
            .http
            .get(&url)
            .query(&self.query(lat, lng))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let reading = to_reading(&resp.weather, resp.main.temp);
        debug!(
            condition = %reading.condition,
            temp = resp.main.temp,
            multiplier = reading.multiplier,
            "live weather reading"
        );
        Ok(reading)
    }

    /// Pick the 3-hourly slot closest to the target hour on the target date.
    async fn fetch_forecast(
        &self,
        lat: f64,
        lng: f64,
        ctx: &TimeContext,
    ) -> crate::error::Result<WeatherReading> {
        let url = format!("{}/forecast", self.base_url);
        let resp: OwmForecastResponse = self
            .http
            .get(&url)
            .query(&self.query(lat, lng))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let date_prefix = ctx.date.format("%Y-%m-%d").to_string();
        let slot = resp
            .list
            .iter()
            .filter(|s| s.dt_txt.starts_with(&date_prefix))
            .min_by_key(|s| {
                let hour: i64 = s
                    .dt_txt
                    .get(11..13)
                    .and_then(|h| h.parse().ok())
                    .unwrap_or(0);
                (hour - ctx.hour as i64).abs()
            })
            .ok_or_else(|| {
                crate::error::EngineError::Provider("no forecast slot for target date".into())
            })?;

        let reading = to_reading(&slot.weather, slot.main.temp);
        debug!(slot = %slot.dt_txt, multiplier = reading.multiplier, "forecast weather reading");
        Ok(reading)
    }

    fn query(&self, lat: f64, lng: f64) -> [(&'static str, String); 4] {
        [
            ("lat", lat.to_string()),
            ("lon", lng.to_string()),
            ("appid", self.api_key.clone()),
            ("units", "imperial".to_string()),
        ]
    }
}

fn to_reading(conditions: &[OwmCondition], temp: f64) -> WeatherReading {
    let condition = conditions
        .first()
        .map(|c| c.description.clone())
        .unwrap_or_else(|| "unknown".to_string());
    let kind = conditions
        .first()
        .map(|c| c.main.to_lowercase())
        .unwrap_or_default();
    WeatherReading {
        multiplier: condition_multiplier(&kind, temp),
        condition,
        temp_f: Some(temp),
        provenance: Provenance::Live("openweathermap"),
    }
}

/// Map a condition category and temperature to a demand multiplier.
/// Precipitation dominates; temperature extremes matter only in clear air.
fn condition_multiplier(kind: &str, temp_f: f64) -> f64 {
    match kind {
        "snow" => 1.5,
        "rain" | "drizzle" | "thunderstorm" => 1.4,
        _ => {
            if !(40.0..=85.0).contains(&temp_f) {
                1.2
            } else {
                1.0
            }
        }
    }
}

fn seasonal_estimate(ctx: &TimeContext) -> WeatherReading {
    let (multiplier, condition) = if ctx.is_winter() {
        (1.15, "winter seasonal estimate")
    } else if ctx.is_summer() {
        (1.05, "summer seasonal estimate")
    } else {
        (1.0, "mild seasonal estimate")
    };
    WeatherReading {
        multiplier,
        condition: condition.to_string(),
        temp_f: None,
        provenance: Provenance::Estimate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn precipitation_beats_temperature() {
        assert_eq!(condition_multiplier("snow", 70.0), 1.5);
        assert_eq!(condition_multiplier("rain", 30.0), 1.4);
        assert_eq!(condition_multiplier("thunderstorm", 95.0), 1.4);
    }

    #[test]
    fn clear_weather_checks_temperature() {
        assert_eq!(condition_multiplier("clear", 70.0), 1.0);
        assert_eq!(condition_multiplier("clear", 35.0), 1.2);
        assert_eq!(condition_multiplier("clouds", 90.0), 1.2);
    }

    #[test]
    fn estimate_follows_season() {
        let jan = TimeContext::new(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(), 12);
        let jul = TimeContext::new(NaiveDate::from_ymd_opt(2025, 7, 15).unwrap(), 12);
        let apr = TimeContext::new(NaiveDate::from_ymd_opt(2025, 4, 15).unwrap(), 12);

        assert_eq!(seasonal_estimate(&jan).multiplier, 1.15);
        assert_eq!(seasonal_estimate(&jul).multiplier, 1.05);
        assert_eq!(seasonal_estimate(&apr).multiplier, 1.0);
        assert_eq!(seasonal_estimate(&apr).provenance, Provenance::Estimate);
    }
}

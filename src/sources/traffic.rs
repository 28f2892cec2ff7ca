//! Traffic source client.
//!
//! Live path compares in-traffic travel time against free-flow travel time
//! on a short probe route through the city center (Google Distance Matrix).
//! Without a key the client estimates congestion from rush-hour patterns.

use crate::config::ProviderConfig;
use crate::sources::types::{Provenance, TrafficReading};
use crate::timeslot::TimeContext;
use serde::Deserialize;
use tracing::{debug, warn};

/// Probe route length in degrees, roughly two miles across downtown.
const PROBE_OFFSET_DEG: f64 = 0.03;

#[derive(Debug, Deserialize)]
struct DmResponse {
    rows: Vec<DmRow>,
}

#[derive(Debug, Deserialize)]
struct DmRow {
    elements: Vec<DmElement>,
}

#[derive(Debug, Deserialize)]
struct DmElement {
    status: String,
    duration: Option<DmValue>,
    duration_in_traffic: Option<DmValue>,
}

#[derive(Debug, Deserialize)]
struct DmValue {
    value: f64,
}

pub struct TrafficClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TrafficClient {
    pub fn new(http: reqwest::Client, providers: &ProviderConfig) -> Self {
        Self {
            http,
            base_url: providers.google_maps_base_url.clone(),
            api_key: providers.google_maps_api_key.clone(),
        }
    }

    pub async fn fetch(&self, lat: f64, lng: f64, ctx: &TimeContext) -> TrafficReading {
        if self.api_key.is_empty() {
            return rush_hour_estimate(ctx);
        }
        match self.fetch_live(lat, lng).await {
            Ok(reading) => reading,
            Err(err) => {
                warn!(%err, "traffic provider failed, using rush-hour estimate");
                rush_hour_estimate(ctx)
            }
        }
    }

    async fn fetch_live(&self, lat: f64, lng: f64) -> crate::error::Result<TrafficReading> {
        let url = format!("{}/distancematrix/json", self.base_url);
        let origin = format!("{lat},{lng}");
        let dest = format!("{},{}", lat + PROBE_OFFSET_DEG, lng + PROBE_OFFSET_DEG);
        let resp: DmResponse = self
            .http
            .get(&url)
            .query(&[
                ("origins", origin),
                ("destinations", dest),
                ("departure_time", "now".to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let element = resp
            .rows
            .first()
            .and_then(|r| r.elements.first())
            .ok_or_else(|| crate::error::EngineError::Provider("empty distance matrix".into()))?;
        if element.status != "OK" {
            return Err(crate::error::EngineError::Provider(format!(
                "distance matrix element status {}",
                element.status
            )));
        }

        let free_flow = element
            .duration
            .as_ref()
            .map(|d| d.value)
            .filter(|v| *v > 0.0)
            .ok_or_else(|| crate::error::EngineError::Provider("missing duration".into()))?;
        let in_traffic = element
            .duration_in_traffic
            .as_ref()
            .map(|d| d.value)
            .unwrap_or(free_flow);

        let level = ((in_traffic / free_flow) - 1.0).clamp(0.0, 1.0);
        let factor = 1.0 + 0.3 * level;
        debug!(free_flow, in_traffic, level, factor, "live traffic reading");

        Ok(TrafficReading {
            level,
            factor,
            provenance: Provenance::Live("google_distance_matrix"),
        })
    }
}

/// Commute peaks dominate; midday runs moderate, nights clear out.
fn rush_hour_estimate(ctx: &TimeContext) -> TrafficReading {
    let (level, factor) = match ctx.hour {
        7..=9 | 17..=19 => (0.7, 1.2),
        10..=15 => (0.4, 1.1),
        _ => (0.5, 1.0),
    };
    TrafficReading {
        level,
        factor,
        provenance: Provenance::Estimate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32) -> TimeContext {
        TimeContext::new(NaiveDate::from_ymd_opt(2025, 11, 4).unwrap(), hour)
    }

    #[test]
    fn rush_hours_peak() {
        assert_eq!(rush_hour_estimate(&at(8)).factor, 1.2);
        assert_eq!(rush_hour_estimate(&at(18)).factor, 1.2);
        assert_eq!(rush_hour_estimate(&at(12)).factor, 1.1);
        assert_eq!(rush_hour_estimate(&at(3)).factor, 1.0);
    }

    #[test]
    fn estimate_provenance_is_marked() {
        let reading = rush_hour_estimate(&at(19));
        assert_eq!(reading.provenance, Provenance::Estimate);
        assert_eq!(reading.level, 0.7);
    }
}

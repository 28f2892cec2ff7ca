//! External data sources and their caching hub.

pub mod events;
pub mod fuel;
pub mod traffic;
pub mod types;
pub mod weather;

use crate::cache::TtlCache;
use crate::config::Config;
use crate::geo::ResolvedLocation;
use crate::timeslot::TimeContext;
use events::EventsClient;
use fuel::FuelClient;
use std::time::Duration;
use traffic::TrafficClient;
use types::{EventsReading, FuelReading, SourceSnapshot, TrafficReading, WeatherReading};
use weather::WeatherClient;

/// Owns the four domain clients and a TTL cache per domain. All fetches go
/// through the caches; the four domains are fetched concurrently.
pub struct SourceHub {
    weather: WeatherClient,
    events: EventsClient,
    traffic: TrafficClient,
    fuel: FuelClient,
    weather_cache: TtlCache<WeatherReading>,
    events_cache: TtlCache<EventsReading>,
    traffic_cache: TtlCache<TrafficReading>,
    fuel_cache: TtlCache<FuelReading>,
}

impl SourceHub {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.providers.request_timeout_secs))
            .user_agent("gigcast/0.1")
            .build()
            .unwrap_or_default();

        Self {
            weather: WeatherClient::new(http.clone(), &config.providers),
            events: EventsClient::new(http.clone(), &config.providers),
            traffic: TrafficClient::new(http, &config.providers),
            fuel: FuelClient::new(&config.costs),
            weather_cache: TtlCache::new(Duration::from_secs(config.cache.weather_ttl_secs)),
            events_cache: TtlCache::new(Duration::from_secs(config.cache.events_ttl_secs)),
            traffic_cache: TtlCache::new(Duration::from_secs(config.cache.traffic_ttl_secs)),
            fuel_cache: TtlCache::new(Duration::from_secs(config.cache.fuel_ttl_secs)),
        }
    }

    /// One snapshot of all four domains. Domain misses are fetched in
    /// parallel; a slow or failing provider never blocks the others past
    /// its own timeout.
    pub async fn snapshot(&self, loc: &ResolvedLocation, ctx: &TimeContext) -> SourceSnapshot {
        let weather_key = slot_key(&loc.city_key, ctx);
        let events_key = format!("{}|{}", loc.city_key, ctx.date);
        let traffic_key = slot_key(&loc.city_key, ctx);
        let fuel_key = loc.state.clone().unwrap_or_else(|| "default".to_string());

        let (weather, events, traffic, fuel) = tokio::join!(
            self.weather_cache
                .get_or_compute(&weather_key, || self.weather.fetch(loc.lat, loc.lng, ctx)),
            self.events_cache
                .get_or_compute(&events_key, || self.events.fetch(loc.lat, loc.lng, ctx)),
            self.traffic_cache
                .get_or_compute(&traffic_key, || self.traffic.fetch(loc.lat, loc.lng, ctx)),
            self.fuel_cache
                .get_or_compute(&fuel_key, || async { self.fuel.fetch(loc.state.as_deref()) }),
        );

        SourceSnapshot {
            weather,
            events,
            traffic,
            fuel,
        }
    }
}

/// Cache key for domains that vary by location, date, and hour.
fn slot_key(city_key: &str, ctx: &TimeContext) -> String {
    format!("{}|{}|{}", city_key, ctx.date, ctx.hour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn slot_keys_carry_location_date_and_hour() {
        let ctx = TimeContext::new(NaiveDate::from_ymd_opt(2025, 11, 8).unwrap(), 18);
        assert_eq!(slot_key("san francisco", &ctx), "san francisco|2025-11-08|18");
    }
}

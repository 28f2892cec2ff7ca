//! Forecast engine.
//!
//! Wires the resolver, source hub, demand composition, and earnings models
//! into one call that always produces a full prediction set. Whole
//! responses are cached per (city, date, hour) so repeat lookups within the
//! TTL return identical forecasts without touching the sources again.

use crate::cache::TtlCache;
use crate::config::{CityTier, Config};
use crate::demand::boost::EventBoostCalculator;
use crate::demand::composer::DemandComposer;
use crate::demand::ServiceKind;
use crate::earnings::{DeliveryModel, Prediction, RideshareModel, Service, SlotInputs};
use crate::geo::{GeoConfidence, GeoResolver, ResolvedLocation};
use crate::sources::types::{Provenance, SourceSnapshot};
use crate::sources::SourceHub;
use crate::timeslot::TimeContext;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// One forecast request. Coordinates win over the location string for
/// resolving the market, but a supplied name still labels the response;
/// a service filter narrows the prediction list.
#[derive(Debug, Clone, Default)]
pub struct EstimateRequest {
    pub location: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub date: Option<String>,
    pub hour: u32,
    pub service: Option<String>,
}

/// Data lineage for one forecast, echoed back so clients can see how much
/// of the answer came from live providers.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastMeta {
    pub geo_confidence: GeoConfidence,
    pub weather_source: Provenance,
    pub events_source: Provenance,
    pub traffic_source: Provenance,
    pub fuel_source: Provenance,
    /// True when no domain had a live provider answer.
    pub reduced_confidence: bool,
    pub weather_condition: String,
    pub event_count: usize,
    pub event_boost: f64,
    pub traffic_level: f64,
    pub traffic_factor: f64,
    pub gas_price: f64,
    pub rideshare_demand: f64,
    pub delivery_demand: f64,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub location: String,
    pub date: String,
    pub hour: u32,
    pub time_slot: String,
    pub predictions: Vec<Prediction>,
    pub metadata: ForecastMeta,
}

pub struct EstimateEngine {
    config: Config,
    resolver: GeoResolver,
    sources: Arc<SourceHub>,
    boost: EventBoostCalculator,
    composer: DemandComposer,
    rideshare: RideshareModel,
    delivery: DeliveryModel,
    responses: TtlCache<Forecast>,
}

impl EstimateEngine {
    pub fn new(config: Config) -> Self {
        let resolver = GeoResolver::new(&config.providers);
        let sources = Arc::new(SourceHub::new(&config));
        let boost = EventBoostCalculator::new(config.boost.clone());
        let composer = DemandComposer::new(config.demand.clone());
        let rideshare = RideshareModel::new(
            config.rideshare.clone(),
            config.rideshare_deadtime.clone(),
            config.costs.wear_tear_per_mile,
            config.market.lyft_adjustment,
            config.market.location_adjustment_threshold,
            config.market.location_adjustment,
        );
        let delivery = DeliveryModel::new(
            config.delivery.clone(),
            config.delivery_deadtime.clone(),
            config.costs.wear_tear_per_mile,
            config.market.ubereats_adjustment,
            config.market.grubhub_adjustment,
            config.market.location_adjustment_threshold,
            config.market.location_adjustment,
        );
        let responses = TtlCache::new(Duration::from_secs(config.cache.response_ttl_secs));

        Self {
            config,
            resolver,
            sources,
            boost,
            composer,
            rideshare,
            delivery,
            responses,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Full estimate for a request. Cached per (city, date, hour); the
    /// service filter is applied on the way out so filtered and unfiltered
    /// requests share a cache slot.
    pub async fn estimate(&self, req: &EstimateRequest) -> Forecast {
        let loc = match (req.lat, req.lng) {
            (Some(lat), Some(lng)) => self.resolver.resolve_coords(lat, lng).await,
            _ => {
                self.resolver
                    .resolve(req.location.as_deref().unwrap_or_default())
                    .await
            }
        };
        let ctx = TimeContext::resolve(req.date.as_deref(), req.hour);
        let key = format!("{}|{}|{}", loc.city_key, ctx.date, ctx.hour);

        let mut forecast = self
            .responses
            .get_or_compute(&key, || self.build_forecast(loc, ctx))
            .await;

        // coordinates decide which market the numbers come from, but the
        // caller's own name is what the response displays
        if req.lat.is_some() && req.lng.is_some() {
            if let Some(name) = req.location.as_deref().map(str::trim) {
                if !name.is_empty() {
                    forecast.location = name.to_string();
                }
            }
        }

        if let Some(filter) = req.service.as_deref() {
            let needle = filter.to_lowercase();
            forecast
                .predictions
                .retain(|p| p.service.to_lowercase().contains(&needle));
        }
        forecast
    }

    /// Convenience wrapper for the common location/date/hour call.
    pub async fn forecast(&self, location: &str, date: Option<&str>, hour: u32) -> Forecast {
        self.estimate(&EstimateRequest {
            location: Some(location.to_string()),
            date: date.map(str::to_string),
            hour,
            ..Default::default()
        })
        .await
    }

    async fn build_forecast(&self, loc: ResolvedLocation, ctx: TimeContext) -> Forecast {
        let snapshot = self.sources.snapshot(&loc, &ctx).await;
        let event_boost = self.boost.boost_at(&snapshot.events.events, ctx.hour);

        info!(
            city = %loc.city_key,
            date = %ctx.date,
            hour = ctx.hour,
            events = snapshot.events.events.len(),
            event_boost,
            traffic_factor = snapshot.traffic.factor,
            "building forecast"
        );

        let tier = self.city_tier(&loc);
        let rideshare_demand =
            self.composer
                .compose(ServiceKind::Rideshare, &ctx, &snapshot.weather, &snapshot.events);
        let delivery_demand =
            self.composer
                .compose(ServiceKind::Delivery, &ctx, &snapshot.weather, &snapshot.events);

        let predictions = Service::ALL
            .iter()
            .map(|svc| {
                let total_demand = match svc.kind() {
                    ServiceKind::Rideshare => rideshare_demand,
                    ServiceKind::Delivery => delivery_demand,
                };
                self.predict(*svc, total_demand, &ctx, &snapshot, event_boost, tier)
            })
            .collect();

        let live = [
            snapshot.weather.provenance,
            snapshot.events.provenance,
            snapshot.traffic.provenance,
            snapshot.fuel.provenance,
        ]
        .iter()
        .any(|p| p.is_live());

        Forecast {
            location: loc.display_name.clone(),
            date: ctx.date.format("%Y-%m-%d").to_string(),
            hour: ctx.hour,
            time_slot: format_time_slot(ctx.hour),
            predictions,
            metadata: ForecastMeta {
                geo_confidence: loc.confidence,
                weather_source: snapshot.weather.provenance,
                events_source: snapshot.events.provenance,
                traffic_source: snapshot.traffic.provenance,
                fuel_source: snapshot.fuel.provenance,
                reduced_confidence: !live,
                weather_condition: snapshot.weather.condition.clone(),
                event_count: snapshot.events.events.len(),
                event_boost,
                traffic_level: snapshot.traffic.level,
                traffic_factor: snapshot.traffic.factor,
                gas_price: snapshot.fuel.price_per_gallon,
                rideshare_demand,
                delivery_demand,
                generated_at: Utc::now().to_rfc3339(),
            },
        }
    }

    fn predict(
        &self,
        service: Service,
        total_demand: f64,
        ctx: &TimeContext,
        snapshot: &SourceSnapshot,
        event_boost: f64,
        tier: Option<&CityTier>,
    ) -> Prediction {
        let kind = service.kind();
        let time_factor = self.composer.time_factor(kind, ctx.hour);

        let supply = &self.config.supply;
        let supply_factor = match kind {
            ServiceKind::Rideshare => supply.rideshare_supply_factors[ctx.hour as usize],
            ServiceKind::Delivery => supply.delivery_supply_factors[ctx.hour as usize],
        };
        let market_density = tier.map(|t| t.base_demand_multiplier).unwrap_or(1.0);
        let supply_ratio = total_demand * market_density / supply_factor.max(0.1);

        let (base_hourly, pricing_tier) = match kind {
            ServiceKind::Rideshare => (
                tier.map(|t| t.base_hourly_rideshare)
                    .unwrap_or(self.config.market.default_base_hourly_rideshare),
                tier.map(|t| t.pricing_multiplier).unwrap_or(1.0),
            ),
            ServiceKind::Delivery => (
                tier.map(|t| t.base_hourly_delivery)
                    .unwrap_or(self.config.market.default_base_hourly_delivery),
                tier.map(|t| t.pricing_multiplier).unwrap_or(1.0),
            ),
        };

        let inputs = SlotInputs {
            total_demand,
            time_factor,
            supply_ratio,
            traffic_level: snapshot.traffic.level,
            traffic_factor: snapshot.traffic.factor,
            event_boost,
            gas_price: snapshot.fuel.price_per_gallon,
            base_hourly,
            pricing_tier,
            hour: ctx.hour,
        };

        match kind {
            ServiceKind::Rideshare => self.rideshare.predict(service, &inputs),
            ServiceKind::Delivery => self.delivery.predict(service, &inputs),
        }
    }

    fn city_tier(&self, loc: &ResolvedLocation) -> Option<&CityTier> {
        self.config.market.cities.get(&loc.city_key)
    }
}

/// 18 -> "6:00 PM - 7:00 PM"
pub fn format_time_slot(hour: u32) -> String {
    fn fmt(h: u32) -> String {
        let h = h % 24;
        let (display, suffix) = match h {
            0 => (12, "AM"),
            1..=11 => (h, "AM"),
            12 => (12, "PM"),
            _ => (h - 12, "PM"),
        };
        format!("{display}:00 {suffix}")
    }
    format!("{} - {}", fmt(hour), fmt(hour + 1))
}

//! Rideshare earnings model.
//!
//! Gross hourly pay scales the city base rate by composed demand, the
//! additive traffic and event-boost terms, and the cost-of-living
//! adjustment. The surge multiplier is derived from demand thresholds and
//! reported alongside, the way rider apps display it. Vehicle costs come
//! off gross and the net is clamped to a plausible band.

use crate::config::{DeadtimeConfig, RideshareConfig};
use crate::demand::ServiceKind;
use crate::earnings::deadtime::{deadtime_minutes, throughput_ceiling};
use crate::earnings::types::{
    hotspot_for, round2, traffic_additive, Prediction, Service, SlotInputs,
};

/// Lyft runs the same model with a pricing haircut.
const LYFT_SCORE_ADJ: f64 = 0.95;
const LYFT_TRIPS_ADJ: f64 = 0.9;

/// Demand level treated as "fully busy" when normalizing the score.
const SCORE_SCALE: f64 = 1.5;

pub struct RideshareModel {
    cfg: RideshareConfig,
    deadtime: DeadtimeConfig,
    wear_tear_per_mile: f64,
    lyft_adjustment: f64,
    location_adjustment_threshold: f64,
    location_adjustment: f64,
}

impl RideshareModel {
    pub fn new(
        cfg: RideshareConfig,
        deadtime: DeadtimeConfig,
        wear_tear_per_mile: f64,
        lyft_adjustment: f64,
        location_adjustment_threshold: f64,
        location_adjustment: f64,
    ) -> Self {
        Self {
            cfg,
            deadtime,
            wear_tear_per_mile,
            lyft_adjustment,
            location_adjustment_threshold,
            location_adjustment,
        }
    }

    /// Threshold surge from composed demand, plus a capped share of the
    /// event boost, all clamped to the surge cap.
    pub fn surge_multiplier(&self, total_demand: f64, event_boost: f64) -> f64 {
        let base = if total_demand > self.cfg.surge_high_threshold {
            self.cfg.surge_high
        } else if total_demand > self.cfg.surge_mid_threshold {
            self.cfg.surge_mid
        } else if total_demand < self.cfg.surge_low_threshold {
            self.cfg.surge_low
        } else {
            1.0
        };
        let event_term =
            (event_boost * self.cfg.event_surge_weight).min(self.cfg.event_surge_cap);
        (base + event_term).min(self.cfg.surge_cap)
    }

    pub fn predict(&self, service: Service, inputs: &SlotInputs) -> Prediction {
        debug_assert_eq!(service.kind(), ServiceKind::Rideshare);

        let is_lyft = service == Service::Lyft;
        let base_hourly = if is_lyft {
            inputs.base_hourly * self.lyft_adjustment
        } else {
            inputs.base_hourly
        };

        let loc_adj = if inputs.pricing_tier > self.location_adjustment_threshold {
            self.location_adjustment
        } else {
            1.0
        };
        let gross = base_hourly
            * inputs.total_demand
            * (1.0 + traffic_additive(inputs.traffic_factor) + inputs.event_boost)
            * loc_adj;

        let raw_trips = (self.cfg.base_trips_per_hour * inputs.time_factor)
            .clamp(self.cfg.min_trips_per_hour, self.cfg.max_trips_per_hour);
        let dt = deadtime_minutes(
            &self.deadtime,
            ServiceKind::Rideshare,
            inputs.hour,
            inputs.supply_ratio,
            inputs.traffic_factor,
        );
        let ceiling = throughput_ceiling(self.cfg.avg_trip_duration_minutes, dt);
        let mut trips = raw_trips.min(ceiling);
        if is_lyft {
            trips *= LYFT_TRIPS_ADJ;
        }

        // congestion stretches miles driven per trip
        let miles = trips * self.cfg.avg_trip_distance_miles * inputs.traffic_factor;
        let cost = miles / self.cfg.avg_mpg * inputs.gas_price + miles * self.wear_tear_per_mile;

        let net = (gross - cost).clamp(self.cfg.net_floor, self.cfg.net_cap);
        let min = (net - self.cfg.range_spread).max(self.cfg.range_floor);
        let max = net + self.cfg.range_spread;

        let mut score = (inputs.total_demand / SCORE_SCALE).min(1.0);
        if is_lyft {
            score *= LYFT_SCORE_ADJ;
        }

        Prediction {
            service: service.display_name().to_string(),
            min: round2(min),
            max: round2(max),
            hotspot: hotspot_for(ServiceKind::Rideshare, inputs.hour).to_string(),
            demand_score: round2(score),
            trips_per_hour: round2(trips),
            surge_multiplier: round2(self.surge_multiplier(inputs.total_demand, inputs.event_boost)),
            color: service.color().to_string(),
            event_boost: round2(inputs.event_boost),
            event_boost_percentage: (inputs.event_boost * 100.0).round() as u32,
        }
    }
}

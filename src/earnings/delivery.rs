//! Food delivery earnings model.
//!
//! Same gross structure as rideshare with a per-service pricing adjustment.
//! Meal-peak multipliers replace the surge ladder in the reported figure,
//! and a stacked-order efficiency kicks in when demand outruns courier
//! supply.

use crate::config::{DeadtimeConfig, DeliveryConfig};
use crate::demand::ServiceKind;
use crate::earnings::deadtime::{deadtime_minutes, throughput_ceiling};
use crate::earnings::types::{
    hotspot_for, round2, traffic_additive, Prediction, Service, SlotInputs,
};

const SCORE_SCALE: f64 = 1.5;

pub struct DeliveryModel {
    cfg: DeliveryConfig,
    deadtime: DeadtimeConfig,
    wear_tear_per_mile: f64,
    ubereats_adjustment: f64,
    grubhub_adjustment: f64,
    location_adjustment_threshold: f64,
    location_adjustment: f64,
}

impl DeliveryModel {
    pub fn new(
        cfg: DeliveryConfig,
        deadtime: DeadtimeConfig,
        wear_tear_per_mile: f64,
        ubereats_adjustment: f64,
        grubhub_adjustment: f64,
        location_adjustment_threshold: f64,
        location_adjustment: f64,
    ) -> Self {
        Self {
            cfg,
            deadtime,
            wear_tear_per_mile,
            ubereats_adjustment,
            grubhub_adjustment,
            location_adjustment_threshold,
            location_adjustment,
        }
    }

    /// Meal-window pay multiplier plus a capped share of the event boost.
    pub fn peak_multiplier(&self, hour: u32, event_boost: f64) -> f64 {
        let base = match hour {
            12..=13 => self.cfg.peak_lunch,
            18..=20 => self.cfg.peak_dinner,
            11 | 17 | 21 => self.cfg.peak_shoulder,
            _ => 1.0,
        };
        let event_term = (event_boost * self.cfg.event_peak_weight).min(self.cfg.event_peak_cap);
        (base + event_term).min(self.cfg.peak_cap)
    }

    fn service_adjustment(&self, service: Service) -> f64 {
        match service {
            Service::UberEats => self.ubereats_adjustment,
            Service::GrubHub => self.grubhub_adjustment,
            _ => 1.0,
        }
    }

    pub fn predict(&self, service: Service, inputs: &SlotInputs) -> Prediction {
        debug_assert_eq!(service.kind(), ServiceKind::Delivery);

        let base_hourly = inputs.base_hourly * self.service_adjustment(service);
        let loc_adj = if inputs.pricing_tier > self.location_adjustment_threshold {
            self.location_adjustment
        } else {
            1.0
        };
        let gross = base_hourly
            * inputs.total_demand
            * (1.0 + traffic_additive(inputs.traffic_factor) + inputs.event_boost)
            * loc_adj;

        let raw = (self.cfg.base_deliveries_per_hour * inputs.time_factor).clamp(
            self.cfg.min_deliveries_per_hour,
            self.cfg.max_deliveries_per_hour,
        );
        let dt = deadtime_minutes(
            &self.deadtime,
            ServiceKind::Delivery,
            inputs.hour,
            inputs.supply_ratio,
            inputs.traffic_factor,
        );
        let ceiling = throughput_ceiling(self.cfg.avg_delivery_duration_minutes, dt);
        let mut deliveries = raw.min(ceiling);
        if inputs.supply_ratio > self.cfg.stacked_min_demand_ratio {
            deliveries =
                (deliveries * self.cfg.stacked_efficiency).min(self.cfg.max_deliveries_per_hour);
        }

        let miles = deliveries * self.cfg.avg_delivery_distance_miles * inputs.traffic_factor;
        // short urban hops wear the vehicle less per mile
        let cost = miles / self.cfg.delivery_mpg * inputs.gas_price
            + miles * self.cfg.wear_factor * self.wear_tear_per_mile;

        let net = (gross - cost).clamp(self.cfg.net_floor, self.cfg.net_cap);
        let min = (net - self.cfg.range_spread).max(self.cfg.range_floor);
        let max = net + self.cfg.range_spread;

        Prediction {
            service: service.display_name().to_string(),
            min: round2(min),
            max: round2(max),
            hotspot: hotspot_for(ServiceKind::Delivery, inputs.hour).to_string(),
            demand_score: round2((inputs.total_demand / SCORE_SCALE).min(1.0)),
            trips_per_hour: round2(deliveries),
            surge_multiplier: round2(self.peak_multiplier(inputs.hour, inputs.event_boost)),
            color: service.color().to_string(),
            event_boost: round2(inputs.event_boost),
            event_boost_percentage: (inputs.event_boost * 100.0).round() as u32,
        }
    }
}

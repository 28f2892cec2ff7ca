//! Service catalog and prediction output types.

use crate::demand::ServiceKind;
use serde::Serialize;

/// Every service a forecast covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    UberX,
    Lyft,
    DoorDash,
    UberEats,
    GrubHub,
}

impl Service {
    pub const ALL: [Service; 5] = [
        Service::UberX,
        Service::Lyft,
        Service::DoorDash,
        Service::UberEats,
        Service::GrubHub,
    ];

    pub fn kind(&self) -> ServiceKind {
        match self {
            Service::UberX | Service::Lyft => ServiceKind::Rideshare,
            Service::DoorDash | Service::UberEats | Service::GrubHub => ServiceKind::Delivery,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Service::UberX => "UberX",
            Service::Lyft => "Lyft",
            Service::DoorDash => "DoorDash",
            Service::UberEats => "UberEats",
            Service::GrubHub => "GrubHub",
        }
    }

    /// Brand color used by map frontends.
    pub fn color(&self) -> &'static str {
        match self {
            Service::UberX => "#4285F4",
            Service::Lyft => "#FF00BF",
            Service::DoorDash => "#FFD700",
            Service::UberEats => "#06C167",
            Service::GrubHub => "#FF8000",
        }
    }
}

/// Per-service hourly earnings prediction. Field names match the wire
/// format map frontends consume.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub service: String,
    /// Net hourly range, costs already subtracted.
    pub min: f64,
    pub max: f64,
    pub hotspot: String,
    /// Normalized 0..1 demand score.
    pub demand_score: f64,
    pub trips_per_hour: f64,
    pub surge_multiplier: f64,
    pub color: String,
    pub event_boost: f64,
    pub event_boost_percentage: u32,
}

/// Everything the earnings models need for one slot, already composed.
#[derive(Debug, Clone, Copy)]
pub struct SlotInputs {
    /// Composed demand multiplier, already capped.
    pub total_demand: f64,
    /// Raw hour-of-day factor, before day/season/weather.
    pub time_factor: f64,
    /// Demand-to-driver-supply ratio relative to baseline.
    pub supply_ratio: f64,
    /// Congestion level, 0 clear to 1 gridlock.
    pub traffic_level: f64,
    /// Travel-time stretch factor derived from the level.
    pub traffic_factor: f64,
    /// Event surge boost in [0, 1.5].
    pub event_boost: f64,
    pub gas_price: f64,
    /// City base hourly gross for this service kind.
    pub base_hourly: f64,
    /// City pricing tier, drives the cost-of-living adjustment.
    pub pricing_tier: f64,
    pub hour: u32,
}

/// Additive earnings term from the traffic factor: congestion raises
/// effective per-hour pricing a little, free-flowing roads shave it, both
/// capped.
pub fn traffic_additive(factor: f64) -> f64 {
    if factor > 1.0 {
        (0.5 * (factor - 1.0)).min(0.3)
    } else if factor < 1.0 {
        (0.2 * (factor - 1.0)).max(-0.1)
    } else {
        0.0
    }
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Where to position during the slot, by service kind and hour.
pub fn hotspot_for(kind: ServiceKind, hour: u32) -> &'static str {
    match kind {
        ServiceKind::Rideshare => match hour {
            6..=9 => "residential commute corridors into downtown",
            10..=13 => "business district lunch traffic",
            16..=19 => "downtown office exits and transit hubs",
            20..=23 => "nightlife and entertainment districts",
            _ => "airport queue and 24-hour venues",
        },
        ServiceKind::Delivery => match hour {
            11..=13 => "restaurant rows near office districts",
            17..=21 => "residential neighborhoods near restaurant clusters",
            _ => "late-night food corridors",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traffic_term_is_capped_both_ways() {
        assert_eq!(traffic_additive(1.0), 0.0);
        assert!((traffic_additive(1.2) - 0.1).abs() < 1e-9);
        assert_eq!(traffic_additive(1.9), 0.3);
        assert!((traffic_additive(0.9) - (-0.02)).abs() < 1e-9);
        assert_eq!(traffic_additive(0.2), -0.1);
    }

    #[test]
    fn every_service_has_a_kind_and_color() {
        for svc in Service::ALL {
            assert!(svc.color().starts_with('#'));
            assert!(!svc.display_name().is_empty());
            let _ = svc.kind();
        }
    }
}

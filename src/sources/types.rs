//! Readings produced by the source clients.
//!
//! Every reading carries its provenance so responses can say whether a
//! number came from a live provider, a time-based estimate, or the
//! hardcoded default. Provider failures downgrade provenance instead of
//! propagating errors.

use serde::Serialize;

/// Where a reading came from. Live readings carry the provider that
/// answered; on the wire the tag is the provider name, "estimate", or
/// "default".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Live(&'static str),
    Estimate,
    Default,
}

impl Provenance {
    pub fn is_live(&self) -> bool {
        matches!(self, Provenance::Live(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Provenance::Live(provider) => provider,
            Provenance::Estimate => "estimate",
            Provenance::Default => "default",
        }
    }
}

impl Serialize for Provenance {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Weather demand signal. Rain and snow push riders off sidewalks and
/// into cars; extreme temperatures do the same.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReading {
    pub multiplier: f64,
    pub condition: String,
    pub temp_f: Option<f64>,
    pub provenance: Provenance,
}

/// A single event near the requested location.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub name: String,
    pub venue: String,
    pub category: String,
    /// Estimated venue capacity, from venue data or name heuristics.
    pub capacity: u32,
    /// Local start hour as a fraction (19.5 = 7:30 PM).
    pub start_hour: f64,
    /// Typical duration for the event's category.
    pub duration_hours: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventsReading {
    pub events: Vec<Event>,
    /// Baseline calendar multiplier used when no live events are known.
    /// With live events the boost calculator carries the signal instead.
    pub event_multiplier: f64,
    pub provenance: Provenance,
}

/// Road congestion for the slot. `level` is 0 (clear) to 1 (gridlock);
/// `factor` is the travel-time stretch derived from it, 1.0 to 1.3.
#[derive(Debug, Clone, Serialize)]
pub struct TrafficReading {
    pub level: f64,
    pub factor: f64,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, Serialize)]
pub struct FuelReading {
    pub price_per_gallon: f64,
    pub provenance: Provenance,
}

/// One coherent snapshot of all four domains for a location/time slot.
#[derive(Debug, Clone, Serialize)]
pub struct SourceSnapshot {
    pub weather: WeatherReading,
    pub events: EventsReading,
    pub traffic: TrafficReading,
    pub fuel: FuelReading,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provenance_serializes_to_its_label() {
        let live = serde_json::to_value(Provenance::Live("ticketmaster")).unwrap();
        assert_eq!(live, "ticketmaster");
        assert_eq!(
            serde_json::to_value(Provenance::Estimate).unwrap(),
            "estimate"
        );
        assert_eq!(serde_json::to_value(Provenance::Default).unwrap(), "default");
    }

    #[test]
    fn only_live_readings_count_as_live() {
        assert!(Provenance::Live("openweathermap").is_live());
        assert!(!Provenance::Estimate.is_live());
        assert!(!Provenance::Default.is_live());
    }
}

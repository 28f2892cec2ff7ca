//! Demand multiplier composition.
//!
//! Multiplies the hour-of-day baseline with day-of-week, seasonal, weather,
//! and calendar-event factors, then clamps to the per-service cap so no
//! combination of inputs produces runaway demand.

use crate::config::DemandConfig;
use crate::demand::ServiceKind;
use crate::sources::types::{EventsReading, WeatherReading};
use crate::timeslot::TimeContext;

/// Nothing pushes demand below this; markets are never fully dead.
const DEMAND_FLOOR: f64 = 0.1;

pub struct DemandComposer {
    cfg: DemandConfig,
}

impl DemandComposer {
    pub fn new(cfg: DemandConfig) -> Self {
        Self { cfg }
    }

    pub fn time_factor(&self, kind: ServiceKind, hour: u32) -> f64 {
        let table = match kind {
            ServiceKind::Rideshare => &self.cfg.rideshare_time_factors,
            ServiceKind::Delivery => &self.cfg.delivery_time_factors,
        };
        table[hour.min(23) as usize]
    }

    fn day_factor(&self, kind: ServiceKind, ctx: &TimeContext) -> f64 {
        match kind {
            ServiceKind::Rideshare => {
                if ctx.is_weekend {
                    self.cfg.rideshare_weekend
                } else if ctx.is_friday {
                    self.cfg.rideshare_friday
                } else {
                    1.0
                }
            }
            ServiceKind::Delivery => {
                if ctx.is_weekend {
                    self.cfg.delivery_weekend
                } else if ctx.is_friday {
                    self.cfg.delivery_friday
                } else {
                    1.0
                }
            }
        }
    }

    fn seasonal_factor(&self, kind: ServiceKind, ctx: &TimeContext) -> f64 {
        if ctx.is_holiday_season() {
            self.cfg.holiday_seasonal
        } else if ctx.is_summer() {
            match kind {
                ServiceKind::Rideshare => self.cfg.rideshare_summer,
                // people cook out instead of ordering in
                ServiceKind::Delivery => self.cfg.delivery_summer,
            }
        } else {
            1.0
        }
    }

    /// Composed total demand multiplier, clamped to the per-service cap.
    pub fn compose(
        &self,
        kind: ServiceKind,
        ctx: &TimeContext,
        weather: &WeatherReading,
        events: &EventsReading,
    ) -> f64 {
        let raw = self.time_factor(kind, ctx.hour)
            * self.day_factor(kind, ctx)
            * self.seasonal_factor(kind, ctx)
            * weather.multiplier
            * events.event_multiplier;

        let cap = match kind {
            ServiceKind::Rideshare => self.cfg.rideshare_cap,
            ServiceKind::Delivery => self.cfg.delivery_cap,
        };
        raw.clamp(DEMAND_FLOOR, cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::types::Provenance;
    use chrono::NaiveDate;

    fn weather(multiplier: f64) -> WeatherReading {
        WeatherReading {
            multiplier,
            condition: "test".into(),
            temp_f: None,
            provenance: Provenance::Estimate,
        }
    }

    fn events(multiplier: f64) -> EventsReading {
        EventsReading {
            events: Vec::new(),
            event_multiplier: multiplier,
            provenance: Provenance::Estimate,
        }
    }

    fn composer() -> DemandComposer {
        DemandComposer::new(DemandConfig::default())
    }

    #[test]
    fn saturday_dinner_storm_hits_the_rideshare_cap() {
        // 2025-11-08: Saturday in holiday season, 6 PM, heavy rain, busy calendar
        let ctx = TimeContext::new(NaiveDate::from_ymd_opt(2025, 11, 8).unwrap(), 18);
        let total = composer().compose(ServiceKind::Rideshare, &ctx, &weather(1.4), &events(1.3));
        assert_eq!(total, 1.8);
    }

    #[test]
    fn delivery_cap_is_higher() {
        let ctx = TimeContext::new(NaiveDate::from_ymd_opt(2025, 11, 8).unwrap(), 18);
        let total = composer().compose(ServiceKind::Delivery, &ctx, &weather(1.5), &events(1.3));
        assert_eq!(total, 2.0);
    }

    #[test]
    fn quiet_overnight_hours_stay_low_but_floored() {
        // 2025-11-04: Tuesday 3 AM
        let ctx = TimeContext::new(NaiveDate::from_ymd_opt(2025, 11, 4).unwrap(), 3);
        let rideshare =
            composer().compose(ServiceKind::Rideshare, &ctx, &weather(1.0), &events(1.0));
        let delivery = composer().compose(ServiceKind::Delivery, &ctx, &weather(1.0), &events(1.0));
        assert!(rideshare < 0.5);
        assert!(rideshare >= 0.1);
        // holiday seasonal lifts the 0.05 table entry off the floor slightly
        assert!(delivery >= 0.1 && delivery < rideshare);
    }

    #[test]
    fn summer_diverges_by_service() {
        // 2025-07-15: Tuesday in July, noon
        let ctx = TimeContext::new(NaiveDate::from_ymd_opt(2025, 7, 15).unwrap(), 12);
        let c = composer();
        let rideshare = c.compose(ServiceKind::Rideshare, &ctx, &weather(1.0), &events(1.0));
        let delivery = c.compose(ServiceKind::Delivery, &ctx, &weather(1.0), &events(1.0));
        // rideshare gets a summer lift, delivery a summer dip
        assert!((rideshare - 0.95 * 1.1).abs() < 1e-9);
        assert!((delivery - 1.5 * 0.95).abs() < 1e-9);
    }

    #[test]
    fn weekday_commute_beats_weekend_morning_for_rideshare() {
        let c = composer();
        assert!(c.time_factor(ServiceKind::Rideshare, 8) > c.time_factor(ServiceKind::Rideshare, 14));
        assert!(c.time_factor(ServiceKind::Delivery, 12) > c.time_factor(ServiceKind::Delivery, 15));
    }
}

//! Deadtime model: unpaid minutes between jobs.
//!
//! Waiting for a ping scales with the hour and shrinks when demand outruns
//! driver supply; pickup drive time stretches with traffic; restaurant
//! waits lengthen during meal rushes. The clamped result caps how many
//! jobs an hour can physically hold.

use crate::config::DeadtimeConfig;
use crate::demand::ServiceKind;

/// Unpaid minutes per job at `hour` given the demand/supply ratio and the
/// traffic travel-time factor.
pub fn deadtime_minutes(
    cfg: &DeadtimeConfig,
    kind: ServiceKind,
    hour: u32,
    supply_ratio: f64,
    traffic_factor: f64,
) -> f64 {
    let hour = hour.min(23);
    let wait_scale = match kind {
        ServiceKind::Rideshare => {
            if supply_ratio > 1.0 {
                (1.0 - 0.2 * (supply_ratio - 1.0)).max(0.3)
            } else {
                1.0 + 0.5 * (1.0 - supply_ratio)
            }
        }
        ServiceKind::Delivery => {
            if supply_ratio > 1.5 {
                0.4
            } else if supply_ratio > 1.0 {
                0.7
            } else {
                1.5
            }
        }
    };
    let wait = cfg.avg_wait_minutes * cfg.hour_factors[hour as usize] * wait_scale;
    let pickup = cfg.avg_pickup_minutes * traffic_factor;
    let mut restaurant = cfg.restaurant_wait_minutes;
    if matches!(hour, 12 | 13 | 18 | 19) {
        // kitchens back up during meal rushes
        restaurant *= 1.3;
    }
    (wait + pickup + restaurant).clamp(cfg.min_minutes, cfg.max_minutes)
}

/// Most jobs per hour the clock allows once deadtime is paid.
pub fn throughput_ceiling(job_minutes: f64, deadtime: f64) -> f64 {
    60.0 / (job_minutes + deadtime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn busy_hours_have_less_deadtime() {
        let cfg = Config::default().rideshare_deadtime;
        let peak = deadtime_minutes(&cfg, ServiceKind::Rideshare, 18, 1.5, 1.2);
        let dead_of_night = deadtime_minutes(&cfg, ServiceKind::Rideshare, 2, 0.6, 1.0);
        assert!(peak < dead_of_night);
        assert_eq!(dead_of_night, cfg.max_minutes);
    }

    #[test]
    fn delivery_restaurant_wait_stretches_at_meal_hours() {
        let cfg = Config::default().delivery_deadtime;
        let dinner = deadtime_minutes(&cfg, ServiceKind::Delivery, 19, 1.2, 1.0);
        let late_evening = deadtime_minutes(&cfg, ServiceKind::Delivery, 20, 1.2, 1.0);
        // wait 6*0.6*0.7 + pickup 4 + restaurant 5*1.3 = 13.02
        assert!((dinner - 13.02).abs() < 1e-9);
        // hour 20 has a similar wait factor but no restaurant bump
        assert!(dinner > late_evening);
    }

    #[test]
    fn slammed_delivery_markets_ping_fast() {
        let cfg = Config::default().delivery_deadtime;
        let slammed = deadtime_minutes(&cfg, ServiceKind::Delivery, 15, 2.0, 1.0);
        let starved = deadtime_minutes(&cfg, ServiceKind::Delivery, 15, 0.8, 1.0);
        assert!(slammed < starved);
    }

    #[test]
    fn traffic_stretches_pickup() {
        let cfg = Config::default().rideshare_deadtime;
        let clear = deadtime_minutes(&cfg, ServiceKind::Rideshare, 14, 1.0, 1.0);
        let jammed = deadtime_minutes(&cfg, ServiceKind::Rideshare, 14, 1.0, 1.3);
        assert!((jammed - clear - 7.0 * 0.3).abs() < 1e-9);
    }

    #[test]
    fn clamped_to_configured_bounds() {
        let cfg = Config::default().rideshare_deadtime;
        for hour in 0..24 {
            for ratio in [0.3, 0.8, 1.0, 2.0, 5.0] {
                let dt = deadtime_minutes(&cfg, ServiceKind::Rideshare, hour, ratio, 1.2);
                assert!((cfg.min_minutes..=cfg.max_minutes).contains(&dt));
            }
        }
    }

    #[test]
    fn ceiling_shrinks_with_deadtime() {
        // 18-minute trips with 7 idle minutes allow 2.4 trips
        assert!((throughput_ceiling(18.0, 7.0) - 2.4).abs() < 1e-9);
        assert!(throughput_ceiling(18.0, 25.0) < 1.5);
    }
}

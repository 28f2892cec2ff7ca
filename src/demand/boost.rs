//! Event-driven surge boost.
//!
//! Each event contributes additional demand in a window around its start
//! and end; window width and contribution scale with venue capacity.
//! Contributions are additive across simultaneous events and the sum is
//! clamped, so a festival day cannot push the boost past the cap.

use crate::config::BoostConfig;
use crate::sources::types::Event;

pub struct EventBoostCalculator {
    cfg: BoostConfig,
}

impl EventBoostCalculator {
    pub fn new(cfg: BoostConfig) -> Self {
        Self { cfg }
    }

    /// Total boost for the slot starting at `hour`, in `[0, max_boost]`.
    pub fn boost_at(&self, events: &[Event], hour: u32) -> f64 {
        let total: f64 = events
            .iter()
            .filter(|e| self.is_active(e, hour as f64))
            .map(|e| self.contribution(e))
            .sum();
        total.min(self.cfg.max_boost)
    }

    /// The window runs from `window` hours before the start until `window`
    /// hours after the end. The slot is the whole interval `[hour, hour+1)`,
    /// not a point: a window opening at 16.5 still lifts the 16:00 slot.
    /// Half-open on the right so back-to-back windows do not double-count
    /// a boundary hour.
    fn is_active(&self, event: &Event, hour: f64) -> bool {
        let window = self.window_hours(event.capacity);
        let start = event.start_hour - window;
        let end = event.start_hour + event.duration_hours + window;
        hour + 1.0 > start && hour < end
    }

    fn contribution(&self, event: &Event) -> f64 {
        if event.capacity >= self.cfg.large_capacity {
            self.cfg.large_attendance
        } else if event.capacity >= self.cfg.small_capacity {
            self.cfg.medium_attendance
        } else {
            self.cfg.small_attendance
        }
    }

    fn window_hours(&self, capacity: u32) -> f64 {
        if capacity >= self.cfg.large_capacity {
            self.cfg.large_window_hours
        } else if capacity >= self.cfg.small_capacity {
            self.cfg.medium_window_hours
        } else {
            self.cfg.small_window_hours
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(capacity: u32, start_hour: f64, duration_hours: f64) -> Event {
        Event {
            name: "test".into(),
            venue: "test venue".into(),
            category: "music".into(),
            capacity,
            start_hour,
            duration_hours,
        }
    }

    fn calc() -> EventBoostCalculator {
        EventBoostCalculator::new(BoostConfig::default())
    }

    #[test]
    fn large_event_window_spans_three_hours_each_side() {
        // stadium show 19:00-22:00, window 16:00..25:00
        let events = vec![event(50_000, 19.0, 3.0)];
        let c = calc();
        assert_eq!(c.boost_at(&events, 15), 0.0);
        assert_eq!(c.boost_at(&events, 16), 0.5);
        assert_eq!(c.boost_at(&events, 18), 0.5);
        assert_eq!(c.boost_at(&events, 21), 0.5);
        // windows never wrap past midnight
        assert_eq!(c.boost_at(&events, 2), 0.0);
    }

    #[test]
    fn window_is_half_open_on_the_right() {
        // small club show 20:00-22:00, window [19, 23)
        let events = vec![event(400, 20.0, 2.0)];
        let c = calc();
        assert_eq!(c.boost_at(&events, 19), 0.05);
        assert_eq!(c.boost_at(&events, 22), 0.05);
        assert_eq!(c.boost_at(&events, 23), 0.0);
    }

    #[test]
    fn fractional_start_counts_the_first_window_hour() {
        // arena show 19:30-22:30, window opens 16:30; the 16:00 slot runs
        // through 17:00 and overlaps it
        let events = vec![event(20_000, 19.5, 3.0)];
        let c = calc();
        assert_eq!(c.boost_at(&events, 15), 0.0);
        assert_eq!(c.boost_at(&events, 16), 0.5);
        assert_eq!(c.boost_at(&events, 17), 0.5);
    }

    #[test]
    fn tiers_by_capacity() {
        let c = calc();
        assert_eq!(c.boost_at(&[event(499, 12.0, 2.0)], 12), 0.05);
        assert_eq!(c.boost_at(&[event(500, 12.0, 2.0)], 12), 0.2);
        assert_eq!(c.boost_at(&[event(4_999, 12.0, 2.0)], 12), 0.2);
        assert_eq!(c.boost_at(&[event(5_000, 12.0, 2.0)], 12), 0.5);
    }

    #[test]
    fn simultaneous_events_add_up_to_the_cap() {
        let events = vec![
            event(50_000, 19.0, 3.0),
            event(50_000, 19.0, 3.0),
            event(50_000, 19.0, 3.0),
            event(50_000, 19.0, 3.0),
        ];
        let c = calc();
        assert_eq!(c.boost_at(&events, 20), 1.5);
    }

    #[test]
    fn no_events_means_no_boost() {
        assert_eq!(calc().boost_at(&[], 18), 0.0);
    }
}

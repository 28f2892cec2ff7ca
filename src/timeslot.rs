//! Calendar context for a forecast slot.

use chrono::{Datelike, Local, NaiveDate, Weekday};

/// Everything the demand and earnings models need to know about "when".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeContext {
    pub date: NaiveDate,
    pub hour: u32,
    pub weekday: Weekday,
    pub is_weekend: bool,
    pub is_friday: bool,
    pub month: u32,
}

impl TimeContext {
    pub fn new(date: NaiveDate, hour: u32) -> Self {
        let weekday = date.weekday();
        Self {
            date,
            hour: hour.min(23),
            weekday,
            is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
            is_friday: weekday == Weekday::Fri,
            month: date.month(),
        }
    }

    /// Parse a `YYYY-MM-DD` date, falling back to today on bad input.
    pub fn resolve(date: Option<&str>, hour: u32) -> Self {
        let date = date
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .unwrap_or_else(|| Local::now().date_naive());
        Self::new(date, hour)
    }

    /// November and December.
    pub fn is_holiday_season(&self) -> bool {
        self.month == 11 || self.month == 12
    }

    /// June through August.
    pub fn is_summer(&self) -> bool {
        (6..=8).contains(&self.month)
    }

    /// December through February.
    pub fn is_winter(&self) -> bool {
        self.month == 12 || self.month <= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekend_and_friday_flags() {
        // 2025-11-08 is a Saturday
        let sat = TimeContext::new(NaiveDate::from_ymd_opt(2025, 11, 8).unwrap(), 18);
        assert!(sat.is_weekend);
        assert!(!sat.is_friday);
        assert!(sat.is_holiday_season());

        let fri = TimeContext::new(NaiveDate::from_ymd_opt(2025, 11, 7).unwrap(), 18);
        assert!(fri.is_friday);
        assert!(!fri.is_weekend);
    }

    #[test]
    fn bad_date_falls_back_to_today() {
        let ctx = TimeContext::resolve(Some("not-a-date"), 9);
        assert_eq!(ctx.date, Local::now().date_naive());
        assert_eq!(ctx.hour, 9);
    }

    #[test]
    fn hour_is_clamped() {
        let ctx = TimeContext::resolve(Some("2025-06-15"), 99);
        assert_eq!(ctx.hour, 23);
        assert!(ctx.is_summer());
    }
}

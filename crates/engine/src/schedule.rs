use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};

/// Fires once per weekday (UTC date), on the first timestamp at or after
/// `market_open + offset`.
///
/// The open is a fixed UTC time. US equities open at 14:30 UTC in winter and
/// 13:30 UTC under daylight saving, so a summer replay with the default
/// fires an hour late unless `market_open_utc` is set for the season.
/// Exchange holidays are not known here; a weekday snapshot counts as a
/// trading day.
#[derive(Debug, Clone)]
pub struct DailySchedule {
    trigger: NaiveTime,
    last_fired: Option<NaiveDate>,
}

impl DailySchedule {
    pub fn new(market_open_utc: NaiveTime, minutes_after_open: i64) -> Self {
        let trigger = Duration::try_minutes(minutes_after_open)
            .map_or(market_open_utc, |offset| market_open_utc + offset);
        Self {
            trigger,
            last_fired: None,
        }
    }

    pub fn trigger(&self) -> NaiveTime {
        self.trigger
    }

    /// True when `now` is the first call past today's trigger time on a
    /// weekday. Marks the date as done.
    pub fn due(&mut self, now: DateTime<Utc>) -> bool {
        let date = now.date_naive();
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        if self.last_fired == Some(date) || now.time() < self.trigger {
            return false;
        }
        self.last_fired = Some(date);
        true
    }
}

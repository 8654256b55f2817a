//! Peak/non-peak classification of journey timestamps.
use std::collections::HashMap;

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike, Weekday};

use crate::{EngineError, ResultEngine};

/// Textual format of schedule boundaries.
pub const TIME_FORMAT: &str = "%H:%M";

/// An inclusive `[start, end]` interval of the day with minute precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    #[must_use]
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Parses a window from two `HH:MM` strings.
    ///
    /// Only the format is checked here: ordering between `start` and `end` is
    /// a configuration concern.
    pub fn parse(start: &str, end: &str) -> ResultEngine<Self> {
        Ok(Self::new(parse_time(start)?, parse_time(end)?))
    }

    #[must_use]
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }
}

fn parse_time(value: &str) -> ResultEngine<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|_| {
        EngineError::InvalidConfig(format!(
            "invalid time format: {value}. Expected format is HH:MM"
        ))
    })
}

/// Parses a full weekday name, ignoring case (`"Monday"`, `"sunday"`).
#[must_use]
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.trim().to_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Peak intervals for each day of the week.
///
/// Days without an entry have no peak hours.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PeakSchedule {
    days: HashMap<Weekday, Vec<TimeWindow>>,
}

impl PeakSchedule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the windows of `weekday`.
    pub fn insert(&mut self, weekday: Weekday, windows: Vec<TimeWindow>) {
        self.days.insert(weekday, windows);
    }

    #[must_use]
    pub fn with_day(mut self, weekday: Weekday, windows: Vec<TimeWindow>) -> Self {
        self.insert(weekday, windows);
        self
    }

    #[must_use]
    pub fn windows(&self, weekday: Weekday) -> &[TimeWindow] {
        self.days.get(&weekday).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Classifies timestamps as peak or non-peak.
#[derive(Clone, Debug, Default)]
pub struct PeakHoursChecker {
    schedule: PeakSchedule,
}

impl PeakHoursChecker {
    #[must_use]
    pub fn new(schedule: PeakSchedule) -> Self {
        Self { schedule }
    }

    /// Returns `true` when `at` falls inside one of its weekday's windows.
    ///
    /// Seconds are ignored, so `19:00:59` is still inside a window ending at
    /// `19:00`.
    #[must_use]
    pub fn is_peak(&self, at: NaiveDateTime) -> bool {
        let weekday = at.weekday();
        let time = truncate_to_minute(at.time());

        let peak = self
            .schedule
            .windows(weekday)
            .iter()
            .any(|window| window.contains(time));
        tracing::trace!(%at, ?weekday, peak, "classified journey time");
        peak
    }
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

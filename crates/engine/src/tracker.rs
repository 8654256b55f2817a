//! The per-rider fare accumulator.
//!
//! [`UserJourneyTracker`] consumes journeys in chronological order and decides
//! how much of each base fare is actually charged once the daily and weekly
//! caps of the journey's line combination are taken into account.
//!
//! Resets are **global**: the first journey on a new calendar date clears the
//! daily totals of every line combination, and the first journey seven or more
//! days after the start of the current week clears every weekly total. The
//! week starts on the date of the first journey, not on a fixed weekday.
use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::{FareCalculator, FareCap, Journey, LineCombination, MoneyCents, ResultEngine};

/// Length of the rolling weekly window.
pub const WEEK_DAYS: i64 = 7;

/// Running totals of one rider session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackerState {
    daily: HashMap<LineCombination, MoneyCents>,
    weekly: HashMap<LineCombination, MoneyCents>,
    last_journey_date: Option<NaiveDate>,
    week_start_date: Option<NaiveDate>,
}

impl TrackerState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount charged on `line` since the last daily reset.
    #[must_use]
    pub fn daily_accumulated(&self, line: &LineCombination) -> MoneyCents {
        self.daily.get(line).copied().unwrap_or_default()
    }

    /// Amount charged on `line` since the last weekly reset.
    #[must_use]
    pub fn weekly_accumulated(&self, line: &LineCombination) -> MoneyCents {
        self.weekly.get(line).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn last_journey_date(&self) -> Option<NaiveDate> {
        self.last_journey_date
    }

    #[must_use]
    pub fn week_start_date(&self) -> Option<NaiveDate> {
        self.week_start_date
    }

    /// Starts a new week when none is open or the current one is over.
    ///
    /// Returns `true` if the weekly totals were cleared.
    pub fn roll_week(&mut self, date: NaiveDate) -> bool {
        let expired = match self.week_start_date {
            None => true,
            Some(start) => date - start >= TimeDelta::days(WEEK_DAYS),
        };
        if expired {
            self.weekly.clear();
            self.week_start_date = Some(date);
        }
        expired
    }

    /// Clears the daily totals when `date` differs from the previous journey's
    /// date, then records `date` as the latest journey date.
    ///
    /// Returns `true` if the daily totals were cleared.
    pub fn roll_day(&mut self, date: NaiveDate) -> bool {
        let new_day = self.last_journey_date.is_some_and(|last| last != date);
        if new_day {
            self.daily.clear();
        }
        self.last_journey_date = Some(date);
        new_day
    }

    /// Adds a charged amount to both totals of `line`.
    pub fn record_charge(&mut self, line: &LineCombination, charge: MoneyCents) {
        *self.daily.entry(line.clone()).or_default() += charge;
        *self.weekly.entry(line.clone()).or_default() += charge;
    }
}

/// The part of `base_fare` that fits under both caps.
///
/// `capped_daily` and `capped_weekly` are the post-journey totals after the
/// caps were applied; the room left under each cap is their difference with
/// the pre-journey totals. The result is never more than `base_fare` and never
/// negative as long as the accumulated totals do not exceed their caps.
#[must_use]
pub fn chargeable_amount(
    base_fare: MoneyCents,
    daily_accumulated: MoneyCents,
    capped_daily: MoneyCents,
    weekly_accumulated: MoneyCents,
    capped_weekly: MoneyCents,
) -> MoneyCents {
    base_fare
        .min(capped_daily - daily_accumulated)
        .min(capped_weekly - weekly_accumulated)
        .max(MoneyCents::ZERO)
}

/// Stateful fare engine for a single rider.
///
/// Journeys must be added in non-decreasing timestamp order; the tracker does
/// not sort them.
#[derive(Clone, Debug)]
pub struct UserJourneyTracker {
    calculator: FareCalculator,
    cap: FareCap,
    state: TrackerState,
}

impl UserJourneyTracker {
    #[must_use]
    pub fn new(calculator: FareCalculator, cap: FareCap) -> Self {
        Self {
            calculator,
            cap,
            state: TrackerState::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Records a journey and returns the amount charged for it.
    ///
    /// Fails with [`EngineError::UnknownLineCombination`] if the pair is
    /// missing from the fare or cap table.
    ///
    /// [`EngineError::UnknownLineCombination`]: crate::EngineError::UnknownLineCombination
    pub fn add_journey(
        &mut self,
        origin: &str,
        destination: &str,
        at: NaiveDateTime,
    ) -> ResultEngine<MoneyCents> {
        let line = LineCombination::new(origin, destination);
        self.charge(&line, at)
    }

    /// Same as [`add_journey`](Self::add_journey) for an already parsed
    /// journey.
    pub fn add(&mut self, journey: &Journey) -> ResultEngine<MoneyCents> {
        self.charge(&journey.line, journey.at)
    }

    fn charge(&mut self, line: &LineCombination, at: NaiveDateTime) -> ResultEngine<MoneyCents> {
        let date = at.date();
        if self.state.roll_week(date) {
            tracing::debug!(%date, "weekly totals reset");
        }
        if self.state.roll_day(date) {
            tracing::debug!(%date, "daily totals reset");
        }

        let base_fare = self.calculator.base_fare(line, at)?;
        let daily = self.state.daily_accumulated(line);
        let weekly = self.state.weekly_accumulated(line);

        let capped_daily = self.cap.apply_daily_cap(line, daily + base_fare)?;
        let capped_weekly = self.cap.apply_weekly_cap(line, weekly + base_fare)?;
        let charge = chargeable_amount(base_fare, daily, capped_daily, weekly, capped_weekly);

        self.state.record_charge(line, charge);
        tracing::debug!(
            %line,
            %at,
            base_fare = %base_fare,
            charge = %charge,
            "journey charged"
        );

        Ok(charge)
    }
}

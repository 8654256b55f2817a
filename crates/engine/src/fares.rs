//! Base fare lookup.
use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::{EngineError, LineCombination, MoneyCents, PeakHoursChecker, ResultEngine};

/// Peak and non-peak price of a single journey on a line combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fare {
    pub peak: MoneyCents,
    pub non_peak: MoneyCents,
}

impl Fare {
    #[must_use]
    pub fn new(peak: MoneyCents, non_peak: MoneyCents) -> Self {
        Self { peak, non_peak }
    }
}

pub type FareTable = HashMap<LineCombination, Fare>;

/// Computes the nominal fare of a journey, before any cap is applied.
#[derive(Clone, Debug)]
pub struct FareCalculator {
    peak_hours: PeakHoursChecker,
    fares: FareTable,
}

impl FareCalculator {
    #[must_use]
    pub fn new(peak_hours: PeakHoursChecker, fares: FareTable) -> Self {
        Self { peak_hours, fares }
    }

    /// Returns the peak or non-peak fare of `line` depending on `at`.
    ///
    /// Fails with [`EngineError::UnknownLineCombination`] if `line` is not in
    /// the fare table.
    pub fn base_fare(&self, line: &LineCombination, at: NaiveDateTime) -> ResultEngine<MoneyCents> {
        let fare = self
            .fares
            .get(line)
            .ok_or_else(|| EngineError::UnknownLineCombination(line.clone()))?;

        Ok(if self.peak_hours.is_peak(at) {
            fare.peak
        } else {
            fare.non_peak
        })
    }
}

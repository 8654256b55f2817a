//! Daily and weekly spending caps.
use std::collections::HashMap;

use serde::Deserialize;

use crate::{EngineError, LineCombination, MoneyCents, ResultEngine};

/// Maximum amount charged on a line combination per day and per week.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Cap {
    pub daily: MoneyCents,
    pub weekly: MoneyCents,
}

impl Cap {
    #[must_use]
    pub fn new(daily: MoneyCents, weekly: MoneyCents) -> Self {
        Self { daily, weekly }
    }
}

pub type CapTable = HashMap<LineCombination, Cap>;

/// Clamps accumulated amounts to the configured caps.
#[derive(Clone, Debug)]
pub struct FareCap {
    caps: CapTable,
}

impl FareCap {
    #[must_use]
    pub fn new(caps: CapTable) -> Self {
        Self { caps }
    }

    fn cap(&self, line: &LineCombination) -> ResultEngine<&Cap> {
        self.caps
            .get(line)
            .ok_or_else(|| EngineError::UnknownLineCombination(line.clone()))
    }

    /// `min(accumulated, daily cap)`.
    pub fn apply_daily_cap(
        &self,
        line: &LineCombination,
        accumulated: MoneyCents,
    ) -> ResultEngine<MoneyCents> {
        Ok(accumulated.min(self.cap(line)?.daily))
    }

    /// `min(accumulated, weekly cap)`.
    pub fn apply_weekly_cap(
        &self,
        line: &LineCombination,
        accumulated: MoneyCents,
    ) -> ResultEngine<MoneyCents> {
        Ok(accumulated.min(self.cap(line)?.weekly))
    }
}

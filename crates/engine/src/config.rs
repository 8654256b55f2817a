//! Loading and validation of the fare configuration.
//!
//! The configuration is a JSON document with three sections:
//!
//! ```json
//! {
//!   "peak_hours": { "monday": [["08:00", "10:00"], ["16:30", "19:00"]] },
//!   "fare_chart": { "green,green": { "peak": 2, "non_peak": 1 } },
//!   "cap_chart":  { "green,green": { "daily": 8, "weekly": 55 } }
//! }
//! ```
//!
//! Everything the core components take for granted (well formed times,
//! ordered non-overlapping windows, matching fare and cap charts) is checked
//! here, once, before any journey is priced.
use std::{
    collections::{BTreeSet, HashMap, HashSet},
    fs,
    path::Path,
};

use serde::Deserialize;
use serde_json::Value;

use crate::{
    Cap, CapTable, EngineError, Fare, FareCalculator, FareCap, FareTable, LineCombination,
    PeakHoursChecker, PeakSchedule, ResultEngine, TimeWindow, UserJourneyTracker,
    peak_hours::parse_weekday,
};

const TOP_LEVEL_KEYS: [&str; 3] = ["cap_chart", "fare_chart", "peak_hours"];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    peak_hours: HashMap<String, Vec<Vec<String>>>,
    fare_chart: HashMap<String, Fare>,
    cap_chart: HashMap<String, Cap>,
}

/// Validated fare configuration.
#[derive(Clone, Debug)]
pub struct FareConfig {
    pub peak_hours: PeakSchedule,
    pub fare_chart: FareTable,
    pub cap_chart: CapTable,
}

impl FareConfig {
    /// Reads and validates the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> ResultEngine<Self> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "loading fare configuration");
        let raw = fs::read_to_string(path).map_err(|source| {
            tracing::error!(path = %path.display(), "cannot read configuration file: {source}");
            EngineError::ConfigFile {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let config = Self::from_json_str(&raw)?;
        tracing::info!("fare configuration loaded and validated");
        Ok(config)
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(raw: &str) -> ResultEngine<Self> {
        let value: Value = serde_json::from_str(raw).inspect_err(|err| {
            tracing::error!("cannot decode configuration: {err}");
        })?;
        Self::from_value(value).inspect_err(|err| {
            tracing::error!("invalid configuration: {err}");
        })
    }

    fn from_value(value: Value) -> ResultEngine<Self> {
        validate_top_level(&value)?;
        let raw: RawConfig = serde_json::from_value(value)
            .map_err(|err| EngineError::InvalidConfig(err.to_string()))?;

        let peak_hours = peak_schedule(raw.peak_hours)?;
        let fare_chart = line_table("fare_chart", raw.fare_chart)?;
        let cap_chart = line_table("cap_chart", raw.cap_chart)?;
        ensure_same_combinations(&fare_chart, &cap_chart)?;
        warn_on_loose_caps(&fare_chart, &cap_chart);

        Ok(Self {
            peak_hours,
            fare_chart,
            cap_chart,
        })
    }

    /// Line combinations journeys may use.
    #[must_use]
    pub fn line_combinations(&self) -> HashSet<LineCombination> {
        self.fare_chart.keys().cloned().collect()
    }

    /// Builds a fresh tracker for one rider.
    #[must_use]
    pub fn tracker(&self) -> UserJourneyTracker {
        let checker = PeakHoursChecker::new(self.peak_hours.clone());
        UserJourneyTracker::new(
            FareCalculator::new(checker, self.fare_chart.clone()),
            FareCap::new(self.cap_chart.clone()),
        )
    }
}

fn validate_top_level(value: &Value) -> ResultEngine<()> {
    let Some(object) = value.as_object() else {
        return Err(EngineError::InvalidConfig(
            "top level config error. Expected a JSON object".to_string(),
        ));
    };

    let expected: BTreeSet<&str> = TOP_LEVEL_KEYS.into_iter().collect();
    let actual: BTreeSet<&str> = object.keys().map(String::as_str).collect();
    if expected == actual {
        return Ok(());
    }

    let mut errors = Vec::new();
    let missing: Vec<&str> = expected.difference(&actual).copied().collect();
    if !missing.is_empty() {
        errors.push(format!("Missing keys: {}", missing.join(", ")));
    }
    let extra: Vec<&str> = actual.difference(&expected).copied().collect();
    if !extra.is_empty() {
        errors.push(format!("Unexpected keys: {}", extra.join(", ")));
    }
    Err(EngineError::InvalidConfig(format!(
        "top level config error. {}",
        errors.join(" ")
    )))
}

fn peak_schedule(raw: HashMap<String, Vec<Vec<String>>>) -> ResultEngine<PeakSchedule> {
    let mut schedule = PeakSchedule::new();
    let mut seen = HashSet::new();

    for (day, slots) in raw {
        let weekday = parse_weekday(&day).ok_or_else(|| {
            EngineError::InvalidConfig(format!("unknown weekday in peak_hours: {day}"))
        })?;
        if !seen.insert(weekday) {
            return Err(EngineError::InvalidConfig(format!(
                "{day} appears more than once in peak_hours"
            )));
        }

        let mut windows: Vec<TimeWindow> = Vec::with_capacity(slots.len());
        for slot in &slots {
            let [start, end] = slot.as_slice() else {
                return Err(EngineError::InvalidConfig(format!(
                    "expected 2 time entries for each slot in {day}, got {}",
                    slot.len()
                )));
            };
            let window = TimeWindow::parse(start, end)?;
            if window.start >= window.end {
                return Err(EngineError::InvalidConfig(format!(
                    "invalid time range in {day}. Start time {start} should be before end time {end}"
                )));
            }
            if let Some(previous) = windows.last()
                && window.start < previous.end
            {
                return Err(EngineError::InvalidConfig(format!(
                    "overlapping time range detected in {day} for {start} and {end}"
                )));
            }
            windows.push(window);
        }

        schedule.insert(weekday, windows);
    }

    Ok(schedule)
}

fn line_table<T>(
    chart: &str,
    raw: HashMap<String, T>,
) -> ResultEngine<HashMap<LineCombination, T>> {
    if raw.is_empty() {
        return Err(EngineError::InvalidConfig(format!("'{chart}' cannot be empty")));
    }

    let mut table = HashMap::with_capacity(raw.len());
    for (key, value) in raw {
        let line: LineCombination = key.parse()?;
        if table.insert(line.clone(), value).is_some() {
            return Err(EngineError::InvalidLineCombination(format!(
                "combination {line} appears more than once in {chart}"
            )));
        }
    }
    Ok(table)
}

fn ensure_same_combinations(fares: &FareTable, caps: &CapTable) -> ResultEngine<()> {
    let fare_lines: BTreeSet<&LineCombination> = fares.keys().collect();
    let cap_lines: BTreeSet<&LineCombination> = caps.keys().collect();
    if fare_lines == cap_lines {
        return Ok(());
    }

    let list = |lines: Vec<&&LineCombination>| {
        lines
            .iter()
            .map(|line| line.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut errors = Vec::new();
    let missing_in_fare: Vec<_> = cap_lines.difference(&fare_lines).collect();
    if !missing_in_fare.is_empty() {
        errors.push(format!(
            "Combinations {} found in cap_chart but missing in fare_chart.",
            list(missing_in_fare)
        ));
    }
    let missing_in_cap: Vec<_> = fare_lines.difference(&cap_lines).collect();
    if !missing_in_cap.is_empty() {
        errors.push(format!(
            "Combinations {} found in fare_chart but missing in cap_chart.",
            list(missing_in_cap)
        ));
    }
    Err(EngineError::InvalidLineCombination(errors.join(" ")))
}

/// Caps that can never bind the way riders expect are accepted but reported.
fn warn_on_loose_caps(fares: &FareTable, caps: &CapTable) {
    for (line, cap) in caps {
        if cap.daily > cap.weekly {
            tracing::warn!(
                %line,
                daily = %cap.daily,
                weekly = %cap.weekly,
                "daily cap exceeds weekly cap"
            );
        }
        if let Some(fare) = fares.get(line) {
            let highest = fare.peak.max(fare.non_peak);
            if cap.daily < highest || cap.weekly < highest {
                tracing::warn!(%line, fare = %highest, "cap is lower than a single fare");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use super::*;
    use crate::MoneyCents;

    const SAMPLE: &str = r#"{
        "peak_hours": {
            "monday": [["08:00", "10:00"], ["16:30", "19:00"]],
            "tuesday": [["08:00", "10:00"], ["16:30", "19:00"]],
            "wednesday": [["08:00", "10:00"], ["16:30", "19:00"]],
            "thursday": [["08:00", "10:00"], ["16:30", "19:00"]],
            "friday": [["08:00", "10:00"], ["16:30", "19:00"]],
            "saturday": [["10:00", "14:00"], ["18:00", "23:00"]],
            "sunday": [["18:00", "23:00"]]
        },
        "fare_chart": {
            "green,green": {"peak": 2, "non_peak": 1},
            "red,red": {"peak": 3, "non_peak": 2},
            "green,red": {"peak": 4, "non_peak": 3},
            "red,green": {"peak": 3, "non_peak": 2}
        },
        "cap_chart": {
            "green,green": {"daily": 8, "weekly": 55},
            "red,red": {"daily": 12, "weekly": 70},
            "green,red": {"daily": 15, "weekly": 90},
            "red,green": {"daily": 15, "weekly": 90}
        }
    }"#;

    fn sample_with(section: &str, replacement: serde_json::Value) -> String {
        let mut value: Value = serde_json::from_str(SAMPLE).unwrap();
        value[section] = replacement;
        value.to_string()
    }

    fn invalid_config(raw: &str) -> String {
        match FareConfig::from_json_str(raw) {
            Err(EngineError::InvalidConfig(msg)) => msg,
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn loads_sample() {
        let config = FareConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(config.peak_hours.windows(Weekday::Sun).len(), 1);
        assert_eq!(config.line_combinations().len(), 4);
        assert_eq!(
            config.fare_chart[&LineCombination::new("green", "red")],
            Fare::new(MoneyCents::from_units(4), MoneyCents::from_units(3))
        );
        assert_eq!(
            config.cap_chart[&LineCombination::new("red", "red")].weekly,
            MoneyCents::from_units(70)
        );
    }

    #[test]
    fn rejects_missing_and_unexpected_top_level_keys() {
        let mut value: Value = serde_json::from_str(SAMPLE).unwrap();
        let object = value.as_object_mut().unwrap();
        object.remove("peak_hours");
        object.insert("zones".to_string(), Value::Null);

        let msg = invalid_config(&value.to_string());
        assert!(msg.contains("Missing keys: peak_hours"), "{msg}");
        assert!(msg.contains("Unexpected keys: zones"), "{msg}");
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            FareConfig::from_json_str("{ not json"),
            Err(EngineError::Json(_))
        ));
        assert!(invalid_config("[]").starts_with("top level config error"));
    }

    #[test]
    fn rejects_unknown_weekday() {
        let raw = sample_with("peak_hours", serde_json::json!({"funday": [["08:00", "10:00"]]}));
        assert_eq!(invalid_config(&raw), "unknown weekday in peak_hours: funday");
    }

    #[test]
    fn accepts_mixed_case_weekdays_and_missing_days() {
        let raw = sample_with("peak_hours", serde_json::json!({"Monday": [["08:00", "10:00"]]}));
        let config = FareConfig::from_json_str(&raw).unwrap();
        assert_eq!(config.peak_hours.windows(Weekday::Mon).len(), 1);
        assert!(config.peak_hours.windows(Weekday::Tue).is_empty());
    }

    #[test]
    fn rejects_slot_with_wrong_arity() {
        let raw = sample_with("peak_hours", serde_json::json!({"monday": [["08:00"]]}));
        assert_eq!(
            invalid_config(&raw),
            "expected 2 time entries for each slot in monday, got 1"
        );
    }

    #[test]
    fn rejects_bad_time_format() {
        let raw = sample_with("peak_hours", serde_json::json!({"monday": [["8 am", "10:00"]]}));
        assert!(invalid_config(&raw).starts_with("invalid time format: 8 am"));
    }

    #[test]
    fn rejects_reversed_window() {
        let raw = sample_with("peak_hours", serde_json::json!({"monday": [["10:00", "08:00"]]}));
        assert!(invalid_config(&raw).starts_with("invalid time range in monday"));
    }

    #[test]
    fn rejects_overlapping_windows() {
        let raw = sample_with(
            "peak_hours",
            serde_json::json!({"monday": [["08:00", "10:00"], ["09:30", "11:00"]]}),
        );
        assert!(invalid_config(&raw).starts_with("overlapping time range detected in monday"));

        let touching = sample_with(
            "peak_hours",
            serde_json::json!({"monday": [["08:00", "10:00"], ["10:00", "11:00"]]}),
        );
        assert!(FareConfig::from_json_str(&touching).is_ok());
    }

    #[test]
    fn rejects_empty_chart() {
        let raw = sample_with("fare_chart", serde_json::json!({}));
        assert_eq!(invalid_config(&raw), "'fare_chart' cannot be empty");
    }

    #[test]
    fn rejects_chart_entries_with_wrong_keys() {
        let raw = sample_with(
            "fare_chart",
            serde_json::json!({"green,green": {"peak": 2, "offpeak": 1}}),
        );
        assert!(invalid_config(&raw).contains("offpeak"));

        let raw = sample_with("cap_chart", serde_json::json!({"green,green": {"daily": 8}}));
        assert!(invalid_config(&raw).contains("weekly"));
    }

    #[test]
    fn rejects_non_numeric_or_negative_amounts() {
        let raw = sample_with(
            "cap_chart",
            serde_json::json!({"green,green": {"daily": "a lot", "weekly": 55}}),
        );
        assert!(FareConfig::from_json_str(&raw).is_err());

        let raw = sample_with(
            "cap_chart",
            serde_json::json!({"green,green": {"daily": -8, "weekly": 55}}),
        );
        assert!(invalid_config(&raw).contains("must not be negative"));
    }

    #[test]
    fn rejects_mismatched_charts() {
        let raw = sample_with(
            "cap_chart",
            serde_json::json!({
                "green,green": {"daily": 8, "weekly": 55},
                "blue,blue": {"daily": 8, "weekly": 55}
            }),
        );
        let Err(EngineError::InvalidLineCombination(msg)) = FareConfig::from_json_str(&raw) else {
            panic!("expected InvalidLineCombination");
        };
        assert!(
            msg.contains("Combinations blue,blue found in cap_chart but missing in fare_chart."),
            "{msg}"
        );
        assert!(
            msg.contains(
                "Combinations green,red, red,green, red,red found in fare_chart but missing in cap_chart."
            ),
            "{msg}"
        );
    }

    #[test]
    fn rejects_malformed_chart_key() {
        let raw = sample_with(
            "fare_chart",
            serde_json::json!({"green": {"peak": 2, "non_peak": 1}}),
        );
        assert!(matches!(
            FareConfig::from_json_str(&raw),
            Err(EngineError::InvalidLineCombination(_))
        ));
    }

    #[test]
    fn chart_keys_are_case_insensitive() {
        let raw = sample_with(
            "fare_chart",
            serde_json::json!({
                "Green,Green": {"peak": 2, "non_peak": 1},
                "RED,RED": {"peak": 3, "non_peak": 2},
                "green,red": {"peak": 4, "non_peak": 3},
                "red,green": {"peak": 3, "non_peak": 2}
            }),
        );
        let config = FareConfig::from_json_str(&raw).unwrap();
        assert!(config.line_combinations().contains(&LineCombination::new("red", "red")));
    }
}

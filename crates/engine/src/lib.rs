//! Fare engine: prices a rider's journeys with peak/non-peak fares and
//! rolling daily/weekly caps per line combination.
//!
//! The moving parts, leaves first:
//!
//! - [`PeakHoursChecker`] tells peak from non-peak times;
//! - [`FareCalculator`] looks up the base fare of a journey;
//! - [`FareCap`] clamps accumulated amounts to the daily/weekly caps;
//! - [`UserJourneyTracker`] keeps the running totals of one rider and decides
//!   how much of each journey is charged.
//!
//! [`FareConfig`] loads and validates the JSON configuration those components
//! are built from, [`read_journeys`] reads the journeys CSV, and
//! [`calculate_total_fare`] ties everything together for a batch.
//!
//! ```rust
//! use fare_engine::{FareConfig, Journey, MoneyCents, calculate_total_fare};
//!
//! let config = FareConfig::from_json_str(r#"{
//!     "peak_hours": { "monday": [["08:00", "10:00"]] },
//!     "fare_chart": { "green,green": { "peak": 2, "non_peak": 1 } },
//!     "cap_chart": { "green,green": { "daily": 3, "weekly": 10 } }
//! }"#).unwrap();
//!
//! // 2023-09-04 is a Monday: two peak journeys hit the daily cap of 3.
//! let journeys = vec![
//!     Journey::parse("green", "green", "2023-09-04T09:00:00").unwrap(),
//!     Journey::parse("green", "green", "2023-09-04T08:30:00").unwrap(),
//! ];
//! let total = calculate_total_fare(&config, journeys).unwrap();
//! assert_eq!(total, MoneyCents::from_units(3));
//! ```
pub use caps::{Cap, CapTable, FareCap};
pub use config::FareConfig;
pub use error::EngineError;
pub use fares::{Fare, FareCalculator, FareTable};
pub use journeys::{
    CSV_HEADER, DATE_FORMAT, Journey, read_journeys, read_journeys_from_path,
};
pub use line::LineCombination;
pub use money::MoneyCents;
pub use peak_hours::{PeakHoursChecker, PeakSchedule, TIME_FORMAT, TimeWindow, parse_weekday};
pub use tracker::{TrackerState, UserJourneyTracker, WEEK_DAYS, chargeable_amount};

mod caps;
mod config;
mod error;
mod fares;
mod journeys;
mod line;
mod money;
mod peak_hours;
mod tracker;

pub type ResultEngine<T> = Result<T, EngineError>;

/// Prices a rider's journeys and returns the total charged.
///
/// Journeys are sorted chronologically (stable, so simultaneous journeys keep
/// their input order) and fed to a fresh [`UserJourneyTracker`]. The first
/// failing journey aborts the batch.
pub fn calculate_total_fare(
    config: &FareConfig,
    mut journeys: Vec<Journey>,
) -> ResultEngine<MoneyCents> {
    tracing::info!(count = journeys.len(), "calculating total fare");
    journeys.sort_by_key(|journey| journey.at);

    let mut tracker = config.tracker();
    let total = journeys
        .iter()
        .map(|journey| tracker.add(journey))
        .sum::<ResultEngine<MoneyCents>>()?;

    tracing::info!(count = journeys.len(), total = %total, "total fare calculated");
    Ok(total)
}

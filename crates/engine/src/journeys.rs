//! Journey records and the CSV reader that produces them.
use std::{collections::HashSet, fs::File, io, path::Path};

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::{EngineError, LineCombination, ResultEngine};

/// Textual format of journey timestamps.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Columns expected, in order, in the journeys CSV header.
pub const CSV_HEADER: [&str; 3] = ["from_line", "to_line", "date_time"];

/// A single trip of the rider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Journey {
    pub line: LineCombination,
    pub at: NaiveDateTime,
}

impl Journey {
    #[must_use]
    pub fn new(origin: &str, destination: &str, at: NaiveDateTime) -> Self {
        Self {
            line: LineCombination::new(origin, destination),
            at,
        }
    }

    /// Builds a journey from its textual timestamp.
    pub fn parse(origin: &str, destination: &str, date_time: &str) -> ResultEngine<Self> {
        let at = NaiveDateTime::parse_from_str(date_time.trim(), DATE_FORMAT).map_err(|_| {
            EngineError::InvalidJourney(format!("invalid date_time format: {date_time}"))
        })?;
        Ok(Self::new(origin, destination, at))
    }
}

#[derive(Debug, Deserialize)]
struct JourneyRecord {
    from_line: String,
    to_line: String,
    date_time: String,
}

impl JourneyRecord {
    fn validate(self, known: &HashSet<LineCombination>) -> ResultEngine<Journey> {
        let line = LineCombination::new(&self.from_line, &self.to_line);
        if !known.contains(&line) {
            return Err(EngineError::InvalidJourney(format!(
                "invalid journey combination: {} to {}",
                self.from_line, self.to_line
            )));
        }
        let journey = Journey::parse(&self.from_line, &self.to_line, &self.date_time)?;
        Ok(journey)
    }
}

/// Reads and validates journeys from CSV data.
///
/// The header must be exactly `from_line,to_line,date_time`. Every row must
/// name a line combination in `known` and carry a `YYYY-MM-DDTHH:MM:SS`
/// timestamp. Rows keep their file order; sorting is up to the caller.
pub fn read_journeys<R: io::Read>(
    reader: R,
    known: &HashSet<LineCombination>,
) -> ResultEngine<Vec<Journey>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let header = reader.headers()?;
    if !header.iter().eq(CSV_HEADER) {
        tracing::error!(?header, "unexpected CSV header format");
        return Err(EngineError::InvalidJourney(format!(
            "unexpected CSV header format: expected \"{}\"",
            CSV_HEADER.join(",")
        )));
    }

    let journeys = reader
        .deserialize::<JourneyRecord>()
        .map(|record| record?.validate(known))
        .collect::<ResultEngine<Vec<_>>>()?;
    tracing::info!(count = journeys.len(), "read and validated journeys");

    Ok(journeys)
}

/// Opens `path` and reads it with [`read_journeys`].
pub fn read_journeys_from_path(
    path: impl AsRef<Path>,
    known: &HashSet<LineCombination>,
) -> ResultEngine<Vec<Journey>> {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), "reading journeys");
    let file = File::open(path).map_err(|source| {
        tracing::error!(path = %path.display(), "cannot open journeys file: {source}");
        EngineError::JourneysFile {
            path: path.to_path_buf(),
            source,
        }
    })?;
    read_journeys(file, known)
}

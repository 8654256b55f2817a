//! Origin/destination line pairs.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer};

use crate::EngineError;

/// An ordered `(origin, destination)` pair of transit lines.
///
/// It is the key of every per-pair table and accumulator. The pair is **not**
/// commutative: `green,red` and `red,green` are different combinations.
///
/// Line names are trimmed and lowercased on construction, so `Green` and
/// `green` name the same line.
///
/// ```rust
/// use fare_engine::LineCombination;
///
/// let line = LineCombination::new("Green", " Red");
/// assert_eq!(line.to_string(), "green,red");
/// assert_eq!("green,red".parse::<LineCombination>().unwrap(), line);
/// assert_ne!(line, LineCombination::new("red", "green"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCombination {
    origin: String,
    destination: String,
}

impl LineCombination {
    #[must_use]
    pub fn new(origin: &str, destination: &str) -> Self {
        Self {
            origin: normalize(origin),
            destination: normalize(destination),
        }
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }
}

fn normalize(line: &str) -> String {
    line.trim().to_lowercase()
}

impl fmt::Display for LineCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.origin, self.destination)
    }
}

impl FromStr for LineCombination {
    type Err = EngineError;

    /// Parses the `origin,destination` form used by the fare and cap charts.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            EngineError::InvalidLineCombination(format!(
                "\"{s}\" is not an \"origin,destination\" pair"
            ))
        };

        let (origin, destination) = s.split_once(',').ok_or_else(invalid)?;
        if origin.trim().is_empty() || destination.trim().is_empty() || destination.contains(',')
        {
            return Err(invalid());
        }

        Ok(Self::new(origin, destination))
    }
}

impl<'de> Deserialize<'de> for LineCombination {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_names() {
        let line: LineCombination = " Green , RED ".parse().unwrap();
        assert_eq!(line.origin(), "green");
        assert_eq!(line.destination(), "red");
    }

    #[test]
    fn parse_rejects_malformed_pairs() {
        assert!("green".parse::<LineCombination>().is_err());
        assert!(",red".parse::<LineCombination>().is_err());
        assert!("green,".parse::<LineCombination>().is_err());
        assert!("green,red,blue".parse::<LineCombination>().is_err());
    }

    #[test]
    fn direction_matters() {
        assert_ne!(
            LineCombination::new("green", "red"),
            LineCombination::new("red", "green")
        );
    }
}

//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`UnknownLineCombination`] thrown when a line pair is missing from the
//!   fare or cap chart.
//! - [`InvalidConfig`] and [`InvalidLineCombination`] thrown while loading
//!   the fare configuration.
//! - [`InvalidJourney`] thrown while reading the journeys CSV.
//! - [`ConfigFile`] and [`JourneysFile`] thrown when an input file cannot be
//!   read, naming the file.
//!
//!  [`UnknownLineCombination`]: EngineError::UnknownLineCombination
//!  [`InvalidConfig`]: EngineError::InvalidConfig
//!  [`InvalidLineCombination`]: EngineError::InvalidLineCombination
//!  [`InvalidJourney`]: EngineError::InvalidJourney
//!  [`ConfigFile`]: EngineError::ConfigFile
//!  [`JourneysFile`]: EngineError::JourneysFile
use std::path::PathBuf;

use thiserror::Error;

use crate::LineCombination;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" line combination not found!")]
    UnknownLineCombination(LineCombination),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Invalid line combination: {0}")]
    InvalidLineCombination(String),
    #[error("Invalid journey: {0}")]
    InvalidJourney(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Configuration file {} is missing or unreadable: {source}", .path.display())]
    ConfigFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Journeys file {} is missing or unreadable: {source}", .path.display())]
    JourneysFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UnknownLineCombination(a), Self::UnknownLineCombination(b)) => a == b,
            (Self::InvalidConfig(a), Self::InvalidConfig(b)) => a == b,
            (Self::InvalidLineCombination(a), Self::InvalidLineCombination(b)) => a == b,
            (Self::InvalidJourney(a), Self::InvalidJourney(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (
                Self::ConfigFile { path: a, source: x },
                Self::ConfigFile { path: b, source: y },
            )
            | (
                Self::JourneysFile { path: a, source: x },
                Self::JourneysFile { path: b, source: y },
            ) => a == b && x.kind() == y.kind(),
            (Self::Json(a), Self::Json(b)) => a.to_string() == b.to_string(),
            (Self::Csv(a), Self::Csv(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

//! Handles settings for the application.
//!
//! Values are layered, later sources winning: built-in defaults, an optional
//! settings file (`farecap.toml`, `farecap.json`, ...), `FARECAP_*`
//! environment variables, command line flags. When the binary is launched
//! without any argument the user is asked for the main values interactively.
use std::{
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use clap::{Parser, ValueEnum};
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_SETTINGS_PATH: &str = "farecap";

/// Verbosity selected by the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    /// Disable logging entirely.
    None,
    /// Only failures.
    #[default]
    Critical,
}

impl LogLevel {
    /// `tracing` filter directive for this level, `None` when logging is off.
    #[must_use]
    pub fn directive(self) -> Option<&'static str> {
        match self {
            LogLevel::Debug => Some("debug"),
            LogLevel::Info => Some("info"),
            LogLevel::None => None,
            LogLevel::Critical => Some("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Journeys CSV.
    pub filepath: PathBuf,
    /// Fare configuration (JSON).
    pub config_filepath: PathBuf,
    pub log_level: LogLevel,
    /// Log to a timestamped file in `log_dir` instead of the console.
    pub write_log: bool,
    pub log_dir: PathBuf,
    /// Base for relative paths. When unset they are resolved against the
    /// working directory, not the directory of the executable.
    pub base_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            filepath: PathBuf::from("data/target.csv"),
            config_filepath: PathBuf::from("config.json"),
            log_level: LogLevel::default(),
            write_log: false,
            log_dir: PathBuf::from("logs"),
            base_dir: None,
        }
    }
}

impl Settings {
    /// Resolves `path` against `base_dir` unless it is already absolute.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "farecap", about = "Calculate the total fare of the journeys in a CSV file")]
pub struct Args {
    /// Path to the input CSV file.
    #[arg(long)]
    filepath: Option<PathBuf>,
    /// Path to the fare configuration file.
    #[arg(long)]
    config_filepath: Option<PathBuf>,
    /// Set the logging level.
    #[arg(long, value_enum, ignore_case = true)]
    log_level: Option<LogLevel>,
    /// If set, log output to a file. Otherwise, logs are output to the console.
    #[arg(long)]
    write_log: bool,
    /// Directory to save the log file.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// Optional settings file (any format supported by `config`).
    #[arg(long)]
    settings: Option<String>,
}

pub fn load(args: Args) -> Result<Settings> {
    let settings_path = args.settings.as_deref().unwrap_or(DEFAULT_SETTINGS_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(settings_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("FARECAP"));
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(filepath) = args.filepath {
        settings.filepath = filepath;
    }
    if let Some(config_filepath) = args.config_filepath {
        settings.config_filepath = config_filepath;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if args.write_log {
        settings.write_log = true;
    }
    if let Some(log_dir) = args.log_dir {
        settings.log_dir = log_dir;
    }

    Ok(settings)
}

/// Asks for the main settings, keeping the current value on empty answers.
pub fn prompt<R: BufRead, W: Write>(
    mut settings: Settings,
    input: &mut R,
    output: &mut W,
) -> Result<Settings> {
    writeln!(
        output,
        "Interactive mode activated. Please input the required information."
    )?;

    let answer = ask(
        input,
        output,
        &format!(
            "Path to the input CSV file (default: {}): ",
            file_name(&settings.filepath)
        ),
    )?;
    if !answer.is_empty() {
        settings.filepath = PathBuf::from(answer);
    }

    let answer = ask(
        input,
        output,
        &format!(
            "Path to the configuration file (default: {}): ",
            file_name(&settings.config_filepath)
        ),
    )?;
    if !answer.is_empty() {
        settings.config_filepath = PathBuf::from(answer);
    }

    let current = settings
        .log_level
        .to_possible_value()
        .map(|value| value.get_name().to_uppercase())
        .unwrap_or_default();
    let answer = ask(
        input,
        output,
        &format!("Set the logging level (default: {current}): "),
    )?;
    if !answer.is_empty() {
        settings.log_level = LogLevel::from_str(&answer, true)
            .map_err(|_| AppError::InvalidInput(format!("invalid log level: {answer}")))?;
    }

    let answer = ask(
        input,
        output,
        &format!(
            "If set, log output to a file (True/False) (default: {}): ",
            settings.write_log
        ),
    )?;
    if answer.eq_ignore_ascii_case("true") {
        settings.write_log = true;
    }

    if settings.write_log {
        let answer = ask(
            input,
            output,
            &format!(
                "Directory to save the log file (default: {}): ",
                file_name(&settings.log_dir)
            ),
        )?;
        if !answer.is_empty() {
            settings.log_dir = PathBuf::from(answer);
        }
    }

    Ok(settings)
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    write!(output, "{question}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

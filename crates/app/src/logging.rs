use std::{fs, path::PathBuf, sync::Mutex};

use tracing_subscriber::EnvFilter;

use crate::{
    error::{AppError, Result},
    settings::Settings,
};

/// Filter enabling `level` for the binary and the engine only.
pub fn filter(level: &str) -> String {
    format!("farecap={level},fare_engine={level}")
}

/// Name of the file logs are written to when `write_log` is set.
pub fn log_file_name(now: chrono::NaiveDateTime) -> String {
    format!("app_debug_{}.log", now.format("%Y%m%d_%H%M%S"))
}

/// Installs the global subscriber described by `settings`.
///
/// Returns the log file path when logging to a file.
pub fn init(settings: &Settings) -> Result<Option<PathBuf>> {
    let Some(level) = settings.log_level.directive() else {
        return Ok(None);
    };
    let env_filter = EnvFilter::new(filter(level));

    if !settings.write_log {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|err| AppError::Logging(err.to_string()))?;
        return Ok(None);
    }

    let log_dir = settings.resolve(&settings.log_dir);
    fs::create_dir_all(&log_dir)?;
    let path = log_dir.join(log_file_name(chrono::Local::now().naive_local()));
    let file = fs::File::create(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))?;
    tracing::debug!(path = %path.display(), "logging to file");

    Ok(Some(path))
}

use std::process::ExitCode;

use clap::Parser;
use fare_engine::{FareConfig, MoneyCents, calculate_total_fare, read_journeys_from_path};

use crate::{error::Result, settings::Settings};

mod error;
mod logging;
mod settings;

fn main() -> ExitCode {
    // Without any argument the user is guided through the main settings.
    let interactive = std::env::args_os().len() == 1;
    let args = settings::Args::parse();

    let settings = match load_settings(args, interactive) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("An error occurred: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = logging::init(&settings) {
        eprintln!("An error occurred: {err}");
        return ExitCode::FAILURE;
    }

    match run(&settings) {
        Ok(total) => {
            println!("Total Fare: {total}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("An error occurred: {err}");
            ExitCode::FAILURE
        }
    }
}

fn load_settings(args: settings::Args, interactive: bool) -> Result<Settings> {
    let settings = settings::load(args)?;
    if !interactive {
        return Ok(settings);
    }

    let stdin = std::io::stdin();
    settings::prompt(settings, &mut stdin.lock(), &mut std::io::stdout())
}

fn run(settings: &Settings) -> Result<MoneyCents> {
    let config = FareConfig::load(settings.resolve(&settings.config_filepath))?;
    let journeys = read_journeys_from_path(
        settings.resolve(&settings.filepath),
        &config.line_combinations(),
    )?;
    let total = calculate_total_fare(&config, journeys)?;
    Ok(total)
}

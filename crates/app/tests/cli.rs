use std::{
    path::PathBuf,
    process::{Command, Output},
};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn farecap(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_farecap"))
        .current_dir(workspace_root())
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn prints_total_fare() {
    let output = farecap(&[
        "--filepath",
        "data/target.csv",
        "--config-filepath",
        "config.json",
        "--log-level",
        "none",
    ]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "Total Fare: $16\n");
    assert!(output.stderr.is_empty());
}

#[test]
fn missing_journeys_file_fails() {
    let output = farecap(&["--filepath", "data/nope.csv", "--log-level", "none"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("An error occurred: Journeys file data/nope.csv"));
    assert_eq!(stderr.lines().count(), 1);
}

#[test]
fn missing_config_file_fails() {
    let output = farecap(&["--config-filepath", "missing.json", "--log-level", "none"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("An error occurred: Configuration file missing.json"));
}

#[test]
fn default_level_logs_the_error_once() {
    let output = farecap(&["--filepath", "data/nope.csv"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    // The engine's error event, then the user-facing message.
    assert_eq!(stderr.lines().count(), 2);
    assert!(stderr.lines().last().unwrap().starts_with("An error occurred:"));
}

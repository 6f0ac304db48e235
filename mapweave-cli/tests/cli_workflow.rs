//! End-to-end tests for the `mapweave` binary.
//!
//! Each test points `HOME` at a temporary directory so the configuration
//! file and log file never touch the real user profile.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn run_cli(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mapweave"))
        .args(args)
        .env("HOME", home)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute CLI command")
}

fn assert_success(output: &Output, context: &str) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("{} failed:\nstdout: {}\nstderr: {}", context, stdout, stderr);
    }
    stdout
}

#[test]
fn test_layers_marks_band_layers() {
    let home = TempDir::new().unwrap();

    let stdout = assert_success(&run_cli(home.path(), &["layers", "--zoom", "12"]), "layers");
    assert!(stdout.contains("[*] coarse_region"), "{}", stdout);
    assert!(stdout.contains("[*] coarse_price"), "{}", stdout);
    assert!(stdout.contains("[ ] building_markers"), "{}", stdout);

    let stdout = assert_success(
        &run_cli(home.path(), &["layers", "--zoom", "12", "--realtime"]),
        "layers --realtime",
    );
    assert!(stdout.contains("[*] realtime"), "{}", stdout);
    assert!(stdout.contains("[ ] coarse_region"), "{}", stdout);
}

#[test]
fn test_config_init_set_get() {
    let home = TempDir::new().unwrap();

    assert_success(&run_cli(home.path(), &["config", "init"]), "config init");
    assert!(home.path().join(".mapweave").join("config.ini").exists());

    assert_success(
        &run_cli(home.path(), &["config", "set", "zoom.threshold_high", "11"]),
        "config set",
    );
    let stdout = assert_success(
        &run_cli(home.path(), &["config", "get", "zoom.threshold_high"]),
        "config get",
    );
    assert_eq!(stdout.trim(), "11");
}

#[test]
fn test_config_set_rejects_inverted_thresholds() {
    let home = TempDir::new().unwrap();

    let output = run_cli(home.path(), &["config", "set", "zoom.threshold_low", "20"]);
    assert!(!output.status.success());

    let stdout = assert_success(
        &run_cli(home.path(), &["config", "get", "zoom.threshold_low"]),
        "config get",
    );
    assert_eq!(stdout.trim(), "8");
}

#[test]
fn test_config_unknown_key_fails() {
    let home = TempDir::new().unwrap();

    let output = run_cli(home.path(), &["config", "get", "zoom.nope"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown configuration key"));
}

#[test]
fn test_simulate_renders_and_hovers_building() {
    let home = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();

    fs::write(
        data.path().join("buildings.json"),
        r#"[
            {"houseManageNo": "B-1", "houseName": "Riverside", "avgPrice": 95000, "x": 127.0, "y": 37.5},
            {"houseManageNo": "B-2", "houseName": "Hillside", "x": 127.01, "y": 37.51}
        ]"#,
    )
    .unwrap();
    fs::write(
        data.path().join("details.json"),
        r#"[{"entityKey": "B-1", "houseName": "Riverside Tower", "address": "1 River Rd"}]"#,
    )
    .unwrap();

    let data_dir = data.path().to_str().unwrap();
    let stdout = assert_success(
        &run_cli(
            home.path(),
            &["simulate", "--data", data_dir, "--zoom", "5", "--hover", "B-1"],
        ),
        "simulate",
    );

    assert!(stdout.contains("Popup 'Riverside Tower'"), "{}", stdout);
    assert!(stdout.contains("After leave: 0 popup(s) open"), "{}", stdout);
    assert!(stdout.contains("Fetches:   1"), "{}", stdout);
}

#[test]
fn test_simulate_unknown_hover_target_fails() {
    let home = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();

    let data_dir = data.path().to_str().unwrap();
    let output = run_cli(
        home.path(),
        &["simulate", "--data", data_dir, "--zoom", "5", "--hover", "missing"],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No visible overlay for 'missing'"));
}

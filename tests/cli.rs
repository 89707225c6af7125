use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("casemap").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("casemap"))
        .stdout(predicate::str::contains("heatmap"));
}

#[test]
fn regions_lists_bundled_states() {
    let mut cmd = Command::cargo_bin("casemap").unwrap();
    cmd.arg("regions");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("MH"))
        .stdout(predicate::str::contains("Andaman and Nicobar Islands"));
}

#[test]
fn predict_reports_forecast_value() {
    let mut cmd = Command::cargo_bin("casemap").unwrap();
    cmd.args(["predict", "--state", "AN", "--date", "2022-04-29"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Total Predicted Cases upto 2022-04-29: 10079 cases"));
}

#[test]
fn predict_on_recorded_day_has_no_forecast() {
    // Recorded days are not part of the forecast series.
    let mut cmd = Command::cargo_bin("casemap").unwrap();
    cmd.args(["predict", "--state", "Delhi", "--date", "2022-04-01"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Predicted data not available for the entered date."));
}

#[test]
fn predict_unknown_state() {
    let mut cmd = Command::cargo_bin("casemap").unwrap();
    cmd.args(["predict", "--state", "Atlantis", "--date", "2022-04-29"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("State data not available."));
}

#[test]
fn heatmap_without_data_prints_placeholder() {
    let mut cmd = Command::cargo_bin("casemap").unwrap();
    cmd.args(["heatmap", "--date", "2099-01-01"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No data available for the selected date."));
}

#[test]
fn heatmap_marks_hotspot_and_writes_csv() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("snap.csv");
    let mut cmd = Command::cargo_bin("casemap").unwrap();
    cmd.args(["heatmap", "--date", "2022-04-28", "--out"]).arg(&out);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Maharashtra"))
        .stdout(predicate::str::contains("#ff5722  <- hotspot"));

    let txt = fs::read_to_string(&out).unwrap();
    assert!(txt.starts_with("region,code,value,color,hotspot"));
    assert_eq!(txt.lines().count(), 1 + 37);
}

#[test]
fn diff_prints_percentages() {
    let mut cmd = Command::cargo_bin("casemap").unwrap();
    cmd.arg("diff");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Percentage difference of Cases"))
        .stdout(predicate::str::contains("Goa"));
}

#[test]
fn stats_over_forecast_series() {
    let mut cmd = Command::cargo_bin("casemap").unwrap();
    cmd.args(["stats", "--kind", "forecast"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("DL • forecast  count=7"));
}

#[test]
fn import_then_use_as_dataset() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("cases.csv");
    let json = dir.path().join("cases.json");
    fs::write(
        &csv,
        "region,kind,date,value\n\
         Goa,historical,2022-04-01,100\n\
         Goa,forecast,2022-04-10,80\n",
    )
    .unwrap();

    Command::cargo_bin("casemap")
        .unwrap()
        .args(["import", "--csv"])
        .arg(&csv)
        .arg("--out")
        .arg(&json)
        .assert()
        .success();

    Command::cargo_bin("casemap")
        .unwrap()
        .arg("--data")
        .arg(&json)
        .arg("diff")
        .assert()
        .success()
        .stdout(predicate::str::contains("diff=   20.00%"));
}

#[test]
fn config_file_sets_dataset() {
    let dir = tempdir().unwrap();
    let json = dir.path().join("tiny.json");
    fs::write(&json, r#"{"Goa": {"past": [["2022-04-01", 5]], "prediction": []}}"#).unwrap();
    let cfg = dir.path().join("config.toml");
    fs::write(&cfg, format!("dataset = {:?}\n", json.display().to_string())).unwrap();

    let mut cmd = Command::cargo_bin("casemap").unwrap();
    cmd.arg("--config").arg(&cfg).arg("regions");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Goa"))
        .stdout(predicate::str::contains("Delhi").not());
}

// Live test (opt-in): cargo test --features online
#[cfg(feature = "online")]
#[test]
fn fetch_online_dataset() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("fetched.json");
    let mut cmd = Command::cargo_bin("casemap").unwrap();
    cmd.args(["fetch", "--cutoff", "2022-04-28", "--out"]).arg(&out);
    cmd.assert().success();
    assert!(out.exists());
}

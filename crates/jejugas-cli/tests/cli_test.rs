//! Integration tests for the jejugas binary
//!
//! These tests run the CLI offline against temporary files and check the JSON output.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn jejugas(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jejugas"))
        .args(args)
        .current_dir(dir)
        .env_remove("JEJUGAS_GEOCODER_API_KEY")
        .env_remove("KAKAO_REST_API_KEY")
        .env_remove("JEJUGAS_DEFAULT_RADIUS_KM")
        .output()
        .expect("Failed to execute command")
}

fn json_data(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: Value = serde_json::from_str(&stdout).expect("Output should be valid JSON");
    assert_eq!(parsed["status"], "success");
    parsed["data"].clone()
}

const ROWS: &str = r#"[
    {"UNI_ID": "A0001", "OS_NM": "Jeju Central", "POLL_DIV_CD": "SKE",
     "GIS_X_COOR": "263722.2", "GIS_Y_COOR": "101365.127",
     "prices": {"gasoline": 1700, "diesel": 1550}},
    {"UNI_ID": "A0002", "OS_NM": "Far Away", "GIS_X_COOR": 1000000, "GIS_Y_COOR": 1000000,
     "prices": {"gasoline": 1600}},
    {"UNI_ID": "A0003", "OS_NM": "No Coordinates", "prices": {"diesel": 1500}}
]"#;

#[test]
fn test_convert_offline_json() {
    let dir = TempDir::new().unwrap();
    let output = jejugas(
        dir.path(),
        &["convert", "--x", "263722.2", "--y", "101365.127", "--offline", "--json"],
    );

    assert!(output.status.success(), "Command should succeed");
    let data = json_data(&output);
    assert_eq!(data["mode"], "offline");
    assert_eq!(data["source"], "projection");
    assert_eq!(data["candidate"], "katec_bessel");
    let lat = data["wgs84"]["latitude"].as_f64().unwrap();
    assert!((lat - 33.4996).abs() < 0.001);
}

#[test]
fn test_convert_unreachable_geocoder_names_projection_candidate() {
    let dir = TempDir::new().unwrap();
    let output = jejugas(
        dir.path(),
        &[
            "--api-key",
            "test-key",
            "--geocoder-url",
            "http://127.0.0.1:9",
            "convert",
            "--x",
            "263722.2",
            "--y",
            "101365.127",
            "--timeout-ms",
            "500",
            "--json",
        ],
    );

    assert!(output.status.success());
    let data = json_data(&output);
    assert_eq!(data["mode"], "geocoder");
    assert_eq!(data["source"], "projection");
    assert_eq!(data["candidate"], "katec_bessel");
}

#[test]
fn test_convert_out_of_region_reports_null() {
    let dir = TempDir::new().unwrap();
    let output = jejugas(dir.path(), &["convert", "--x", "150000", "--y", "80000", "--offline", "--json"]);

    assert!(output.status.success());
    let data = json_data(&output);
    assert!(data["wgs84"].is_null());
    assert!(data["candidate"].is_null());
}

#[test]
fn test_convert_reverse() {
    let dir = TempDir::new().unwrap();
    let output = jejugas(dir.path(), &["convert", "--x", "126.5312", "--y", "33.4996", "--reverse", "--json"]);

    assert!(output.status.success());
    let data = json_data(&output);
    let x = data["projected"]["x"].as_f64().unwrap();
    let y = data["projected"]["y"].as_f64().unwrap();
    assert!((x - 263_722.2).abs() < 0.5, "x = {}", x);
    assert!((y - 101_365.13).abs() < 0.5, "y = {}", y);
}

#[test]
fn test_convert_reverse_unknown_candidate_fails() {
    let dir = TempDir::new().unwrap();
    let output = jejugas(
        dir.path(),
        &["convert", "--x", "126.9", "--y", "33.6", "--reverse", "--candidate", "utm52"],
    );
    assert!(!output.status.success());
}

#[test]
fn test_ingest_then_search() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("rows.json"), ROWS).unwrap();

    let output = jejugas(
        dir.path(),
        &["ingest", "rows.json", "--output", "stations.json", "--offline", "--json"],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let data = json_data(&output);
    assert_eq!(data["stations_written"], 3);
    assert_eq!(data["report"]["resolved"], 1);
    assert_eq!(data["report"]["unresolved"], 1);
    assert_eq!(data["report"]["invalid_input"], 1);
    assert!(dir.path().join("stations.json").exists());

    let output = jejugas(
        dir.path(),
        &["search", "stations.json", "--lat", "33.4996", "--lng", "126.5312", "--json"],
    );
    assert!(output.status.success());
    let data = json_data(&output);
    assert_eq!(data["total"], 1);
    assert_eq!(data["items"][0]["station"]["opinet_id"], "A0001");
    assert_eq!(data["stats"]["lowest_price_count"], 1);

    // A second run reuses the stored coordinates
    let output = jejugas(
        dir.path(),
        &["ingest", "rows.json", "--output", "stations.json", "--offline", "--json"],
    );
    let data = json_data(&output);
    assert_eq!(data["report"]["reused"], 1);
    assert_eq!(data["report"]["resolved"], 0);
}

#[test]
fn test_search_listing_sorted_by_price() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("rows.json"), ROWS).unwrap();
    let output = jejugas(dir.path(), &["ingest", "rows.json", "--offline", "--json"]);
    assert!(output.status.success());

    let output = jejugas(
        dir.path(),
        &["search", "--sort-by", "gasoline", "--sort-order", "asc", "--json"],
    );
    assert!(output.status.success());
    let data = json_data(&output);
    let ids: Vec<&str> = data["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["station"]["opinet_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["A0002", "A0001", "A0003"]);
}

#[test]
fn test_search_missing_snapshot_fails() {
    let dir = TempDir::new().unwrap();
    let output = jejugas(dir.path(), &["search", "missing.json"]);
    assert!(!output.status.success());
}

#[test]
fn test_config_reports_sources() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("jejugas.toml"), "batch_size = 25\n").unwrap();

    let output = jejugas(dir.path(), &["config", "--json"]);
    assert!(output.status.success());
    let data = json_data(&output);
    let entries = data.as_array().unwrap();

    let batch = entries.iter().find(|e| e["key"] == "batch_size").unwrap();
    assert_eq!(batch["value"], "25");
    assert_eq!(batch["source"], "File");

    let key = entries.iter().find(|e| e["key"] == "geocoder_api_key").unwrap();
    assert_eq!(key["value"], "(unset)");
}

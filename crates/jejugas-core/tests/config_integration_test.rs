//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use jejugas_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

const ENV_VARS: [&str; 6] = [
    "JEJUGAS_GEOCODER_URL",
    "JEJUGAS_GEOCODER_API_KEY",
    "KAKAO_REST_API_KEY",
    "JEJUGAS_BATCH_SIZE",
    "JEJUGAS_GEOCODE_TIMEOUT_MS",
    "JEJUGAS_CANDIDATE_LIMIT",
];

fn clear_env() {
    for name in ENV_VARS {
        env::remove_var(name);
    }
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", contents).unwrap();
    file
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    let file = config_file(
        r#"
batch_size = 20
geocode_timeout_ms = 4000
"#,
    );

    env::set_var("JEJUGAS_BATCH_SIZE", "40");

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.batch_size.value, 40);
    assert_eq!(config.batch_size.source, ConfigSource::Environment);
    // Not set in the environment, file value stays
    assert_eq!(config.geocode_timeout_ms.value, 4000);
    assert_eq!(config.geocode_timeout_ms.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_environment() {
    clear_env();
    env::set_var("JEJUGAS_BATCH_SIZE", "40");

    let mut config = LayeredConfig::with_defaults().load_from_env();
    config.update_from_cli(CliConfigOverrides {
        batch_size: Some(5),
        ..Default::default()
    });

    assert_eq!(config.batch_size.value, 5);
    assert_eq!(config.batch_size.source, ConfigSource::Cli);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_value_is_ignored() {
    clear_env();
    env::set_var("JEJUGAS_CANDIDATE_LIMIT", "lots");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.candidate_limit.value, 500);
    assert_eq!(config.candidate_limit.source, ConfigSource::Default);

    clear_env();
}

#[test]
#[serial]
fn test_provider_api_key_fallback() {
    clear_env();
    env::set_var("KAKAO_REST_API_KEY", "provider-key");

    let config = LayeredConfig::with_defaults().load_from_env();
    assert_eq!(config.geocoder_api_key.value.as_deref(), Some("provider-key"));
    assert_eq!(config.geocoder_api_key.source, ConfigSource::Environment);

    env::set_var("JEJUGAS_GEOCODER_API_KEY", "own-key");
    let config = LayeredConfig::with_defaults().load_from_env();
    assert_eq!(config.geocoder_api_key.value.as_deref(), Some("own-key"));

    clear_env();
}

#[test]
#[serial]
fn test_blank_api_key_is_unset() {
    clear_env();
    env::set_var("JEJUGAS_GEOCODER_API_KEY", "   ");

    let config = LayeredConfig::with_defaults().load_from_env();
    assert_eq!(config.geocoder_api_key.value, None);

    clear_env();
}

#[test]
fn test_malformed_toml_is_reported() {
    let file = config_file("batch_size = \"many\"");
    let result = LayeredConfig::with_defaults().load_from_file(file.path());
    assert!(result.is_err());
}

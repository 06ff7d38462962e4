use crate::config::{Config, DEFAULT_MODEL_PATH};
use std::env;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::time::Duration;

// Global lock to prevent race conditions when modifying environment variables in tests
static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn get_env_lock() -> &'static Mutex<()> {
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

const VARS: &[&str] = &[
    "IPO_MODEL_PATH",
    "SECTOR_TAXONOMY_PATH",
    "REPORT_BASE_URL",
    "REPORT_API_VERSION",
    "HISTORY_YEARS",
    "HTTP_TIMEOUT_SECS",
    "HTTP_MAX_RETRIES",
    "OBSERVABILITY_ENABLED",
];

fn clear_vars() {
    for var in VARS {
        unsafe { env::remove_var(var) };
    }
}

#[test]
fn test_config_defaults() {
    let _guard = get_env_lock().lock().unwrap();
    clear_vars();

    let config = Config::from_env().unwrap();

    assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
    assert!(config.taxonomy_path.is_none());
    assert_eq!(config.report_base_url, "https://webnodejs.chittorgarh.com");
    assert_eq!(config.report_api_version, "02-39");
    assert_eq!((config.history_from, config.history_to), (2024, 2025));
    assert_eq!(config.http_timeout, Duration::from_secs(30));
    assert_eq!(config.http_max_retries, 3);
    assert!(config.observability_enabled);
    assert_eq!(config.load_taxonomy().unwrap().len(), 15);
}

#[test]
fn test_config_overrides() {
    let _guard = get_env_lock().lock().unwrap();
    clear_vars();

    unsafe {
        env::set_var("IPO_MODEL_PATH", "/tmp/model.json");
        env::set_var("HISTORY_YEARS", "2021-2023");
        env::set_var("HTTP_TIMEOUT_SECS", "5");
        env::set_var("HTTP_MAX_RETRIES", "0");
        env::set_var("OBSERVABILITY_ENABLED", "false");
        env::set_var("SECTOR_TAXONOMY_PATH", "  ");
    }

    let config = Config::from_env().unwrap();

    assert_eq!(config.model_path, PathBuf::from("/tmp/model.json"));
    assert_eq!((config.history_from, config.history_to), (2021, 2023));
    assert_eq!(config.http_timeout, Duration::from_secs(5));
    assert_eq!(config.http_max_retries, 0);
    assert!(!config.observability_enabled);
    // Blank path falls back to the reference taxonomy
    assert!(config.taxonomy_path.is_none());

    clear_vars();
}

#[test]
fn test_config_rejects_bad_values() {
    let _guard = get_env_lock().lock().unwrap();
    clear_vars();

    unsafe { env::set_var("HISTORY_YEARS", "2025-2020") };
    assert!(Config::from_env().is_err());

    unsafe {
        env::set_var("HISTORY_YEARS", "2024-2025");
        env::set_var("HTTP_MAX_RETRIES", "many");
    }
    assert!(Config::from_env().is_err());

    clear_vars();
}

#[test]
fn test_config_missing_taxonomy_file() {
    let _guard = get_env_lock().lock().unwrap();
    clear_vars();

    unsafe { env::set_var("SECTOR_TAXONOMY_PATH", "/nonexistent/sectors.toml") };
    let config = Config::from_env().unwrap();
    assert!(config.load_taxonomy().is_err());

    clear_vars();
}

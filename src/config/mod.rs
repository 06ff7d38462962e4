//! Configuration module for ipotrack.
//!
//! Structured configuration loading from environment variables, organized by
//! concern: Model, Report, and Observability.

mod model_config;
mod observability_config;
mod report_config;

pub use model_config::{DEFAULT_MODEL_PATH, ModelEnvConfig};
pub use observability_config::ObservabilityEnvConfig;
pub use report_config::{
    DEFAULT_REPORT_API_VERSION, DEFAULT_REPORT_BASE_URL, ReportEnvConfig, parse_year_range,
};

use crate::domain::sector::SectorTaxonomy;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    // Model (from ModelEnvConfig)
    pub model_path: PathBuf,
    pub taxonomy_path: Option<PathBuf>,

    // Report (from ReportEnvConfig)
    pub report_base_url: String,
    pub report_api_version: String,
    pub history_from: i32,
    pub history_to: i32,
    pub http_timeout: Duration,
    pub http_max_retries: u32,

    // Observability (from ObservabilityEnvConfig)
    pub observability_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let model = ModelEnvConfig::from_env();
        let report = ReportEnvConfig::from_env().context("Failed to load report config")?;
        let observability = ObservabilityEnvConfig::from_env();

        Ok(Self {
            model_path: model.model_path,
            taxonomy_path: model.taxonomy_path,

            report_base_url: report.base_url,
            report_api_version: report.api_version,
            history_from: report.history_from,
            history_to: report.history_to,
            http_timeout: Duration::from_secs(report.http_timeout_secs),
            http_max_retries: report.http_max_retries,

            observability_enabled: observability.enabled,
        })
    }

    /// The configured taxonomy file, or the reference taxonomy when none is set.
    pub fn load_taxonomy(&self) -> Result<SectorTaxonomy> {
        match &self.taxonomy_path {
            Some(path) => load_taxonomy_file(path),
            None => Ok(SectorTaxonomy::reference()),
        }
    }
}

pub fn load_taxonomy_file(path: &Path) -> Result<SectorTaxonomy> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read sector taxonomy {}", path.display()))?;
    let taxonomy = SectorTaxonomy::from_toml_str(&content)
        .with_context(|| format!("Invalid sector taxonomy {}", path.display()))?;
    info!("Loaded {} sectors from {}", taxonomy.len(), path.display());
    Ok(taxonomy)
}

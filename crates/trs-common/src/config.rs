//! ---
//! trs_section: "01-core-functionality"
//! trs_subsection: "module"
//! trs_type: "source"
//! trs_scope: "code"
//! trs_description: "Shared primitives and utilities for the TRS runtime."
//! trs_version: "v0.1.0"
//! trs_owner: "tbd"
//! ---
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::logging::LogFormat;

fn default_site_name() -> String {
    "HPC Hall 2".to_owned()
}

fn default_telemetry_source() -> String {
    "DCIM/SCADA live telemetry (simulated feed)".to_owned()
}

fn default_hall_rows() -> usize {
    4
}

fn default_hall_cols() -> usize {
    6
}

fn default_delta_min() -> f64 {
    0.0
}

fn default_delta_max() -> f64 {
    2.0
}

fn default_delta_step() -> f64 {
    0.2
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::StructuredJson
}

fn default_api_enabled() -> bool {
    true
}

fn default_api_listen() -> SocketAddr {
    "0.0.0.0:3001".parse().expect("valid default api address")
}

/// Primary configuration object for the TRS runtime.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub hall: HallConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: PathBuf,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &str = "TRS_CONFIG";

    /// Load configuration from disk, respecting the `TRS_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration from disk together with the effective source path.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(path.clone())?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(path.clone())?;
                return Ok(LoadedAppConfig {
                    config,
                    source: path,
                });
            }
        }

        Err(anyhow!(
            "no configuration files found. inspected: {}",
            candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }

    fn from_path(path: PathBuf) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.hall.validate()?;
        self.policy.validate()?;
        self.api.validate()?;
        Ok(())
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Descriptive site metadata carried on every snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_name")]
    pub name: String,
    #[serde(default = "default_telemetry_source")]
    pub telemetry_source: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            telemetry_source: default_telemetry_source(),
        }
    }
}

/// Physical hall geometry. Rows are lettered `A`..`Z`, so at most 26 rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HallConfig {
    #[serde(default = "default_hall_rows")]
    pub rows: usize,
    #[serde(default = "default_hall_cols")]
    pub cols: usize,
}

impl HallConfig {
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.rows > 26 {
            return Err(anyhow!(
                "hall rows must be between 1 and 26, got {}",
                self.rows
            ));
        }
        // Columns are zero-padded to two digits in rack identifiers.
        if self.cols == 0 || self.cols > 99 {
            return Err(anyhow!(
                "hall cols must be between 1 and 99, got {}",
                self.cols
            ));
        }
        Ok(())
    }
}

impl Default for HallConfig {
    fn default() -> Self {
        Self {
            rows: default_hall_rows(),
            cols: default_hall_cols(),
        }
    }
}

/// Advertised setpoint-delta range for operator tooling.
///
/// Advisory only: the simulator applies its own hard safety clamp and never
/// trusts this range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_delta_min")]
    pub delta_min: f64,
    #[serde(default = "default_delta_max")]
    pub delta_max: f64,
    #[serde(default = "default_delta_step")]
    pub delta_step: f64,
}

impl PolicyConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.delta_min.is_finite() || !self.delta_max.is_finite() || !self.delta_step.is_finite()
        {
            return Err(anyhow!("policy delta values must be finite"));
        }
        if self.delta_min < 0.0 {
            return Err(anyhow!(
                "policy delta_min must not be negative, got {}",
                self.delta_min
            ));
        }
        if self.delta_min > self.delta_max {
            return Err(anyhow!(
                "policy delta_min {} exceeds delta_max {}",
                self.delta_min,
                self.delta_max
            ));
        }
        if self.delta_step <= 0.0 {
            return Err(anyhow!(
                "policy delta_step must be positive, got {}",
                self.delta_step
            ));
        }
        Ok(())
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            delta_min: default_delta_min(),
            delta_max: default_delta_max(),
            delta_step: default_delta_step(),
        }
    }
}

/// Telemetry generation controls.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct SimulationConfig {
    /// Fixed seed for reproducible halls; entropy-seeded when absent.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_enabled")]
    pub enabled: bool,
    #[serde(default = "default_api_listen")]
    pub listen: SocketAddr,
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: default_api_enabled(),
            listen: default_api_listen(),
            static_dir: None,
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> Result<()> {
        if self.enabled {
            if let Some(dir) = &self.static_dir {
                if !dir.is_dir() {
                    return Err(anyhow!(
                        "api static_dir {} does not exist or is not a directory",
                        dir.display()
                    ));
                }
            }
        }
        Ok(())
    }
}

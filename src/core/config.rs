//! Configuration types for spotcheck

use crate::core::paths;
use crate::SpotCheckError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub contact: ContactConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// BLAST URL API endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Value sent as TOOL so NCBI can identify the client
    #[serde(default = "default_tool_name")]
    pub tool_name: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Use the faster, less sensitive megablast mode
    #[serde(default = "default_megablast")]
    pub megablast: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,
    /// Integer part of the samtools `-s` argument
    #[serde(default)]
    pub seed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_samtools")]
    pub samtools: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContactConfig {
    /// Contact email; takes precedence over the sidecar file
    #[serde(default)]
    pub email: Option<String>,
    /// Alternative location for the sidecar file
    #[serde(default)]
    pub email_file: Option<String>,
}

// Default value functions
fn default_base_url() -> String { "https://blast.ncbi.nlm.nih.gov/Blast.cgi".to_string() }
fn default_tool_name() -> String { "spotcheck".to_string() }
fn default_timeout_secs() -> u64 { 120 }
fn default_connect_timeout_secs() -> u64 { 30 }
fn default_program() -> String { "blastn".to_string() }
fn default_database() -> String { "nr".to_string() }
fn default_filter() -> String { "L".to_string() }
fn default_megablast() -> bool { true }
fn default_sample_count() -> usize { 10 }
fn default_samtools() -> String { "samtools".to_string() }

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            tool_name: default_tool_name(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            database: default_database(),
            filter: default_filter(),
            megablast: default_megablast(),
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            sample_count: default_sample_count(),
            seed: 0,
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            samtools: default_samtools(),
        }
    }
}

impl Config {
    /// Reject values that would make a run meaningless
    pub fn validate(&self) -> Result<(), SpotCheckError> {
        if self.sampling.sample_count == 0 {
            return Err(SpotCheckError::Config(
                "sampling.sample_count must be at least 1".to_string(),
            ));
        }
        if self.service.timeout_secs == 0 {
            return Err(SpotCheckError::Config(
                "service.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.service.base_url.trim().is_empty() {
            return Err(SpotCheckError::Config("service.base_url is empty".to_string()));
        }
        Ok(())
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, SpotCheckError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        SpotCheckError::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| SpotCheckError::Config(format!("Failed to parse config: {}", e)))?;
    config.validate()?;
    Ok(config)
}

/// Load an explicit config file, or the default one when it exists
pub fn load_or_default(explicit: Option<&Path>) -> Result<Config, SpotCheckError> {
    match explicit {
        Some(path) => load_config(path),
        None => {
            let path = paths::default_config_path();
            if path.exists() {
                load_config(path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), SpotCheckError> {
    let path = path.as_ref();
    let contents = toml::to_string_pretty(config)
        .map_err(|e| SpotCheckError::Config(format!("Failed to serialize config: {}", e)))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}

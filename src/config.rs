//! Configuration file handling.
//!
//! This module provides loading and saving of cvesift configuration from a
//! TOML file. Every value can also be overridden per run with a CLI flag;
//! the resolved [`Config`] is what gets passed into the pipeline, so no
//! module-level path constants exist anywhere.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/cvesift/config.toml`
//! - macOS: `~/Library/Application Support/cvesift/config.toml`
//! - Windows: `%APPDATA%\cvesift\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! cve_dir = "cvelistV5/cves/2022"
//! registry_path = "pypi_packages.json"
//! output_dir = "matched/2022"
//! policy = "exact"
//! vendor_keyword = "tensorflow"
//! default_format = "table"
//!
//! [ignore]
//! records = ["CVE-2022-12345", "CVE-2021-*"]
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::model::MatchPolicy;

/// Application configuration.
///
/// This struct represents all configurable options for cvesift. It can be
/// loaded from a TOML file or created with default values, and is passed
/// explicitly into the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory whose immediate subfolders hold the vulnerability records.
    pub cve_dir: PathBuf,

    /// Path to the registry snapshot JSON file.
    pub registry_path: PathBuf,

    /// Root of the output tree; one subfolder per input subfolder.
    pub output_dir: PathBuf,

    /// Active correlation policy.
    pub policy: MatchPolicy,

    /// Vendor keyword used by the membership policy's keep rule.
    pub vendor_keyword: String,

    /// Default output format for the run report when no `--format` flag is
    /// provided.
    ///
    /// Valid values: "table", "json"
    pub default_format: String,

    /// Ignore list configuration for suppressing known records.
    #[serde(default)]
    pub ignore: IgnoreConfig,
}

/// Configuration for suppressing specific records by identifier.
///
/// Use this to drop findings that have already been triaged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Record identifiers to exclude from the output (e.g. "CVE-2022-12345").
    ///
    /// Supports glob patterns (e.g. "CVE-2021-*").
    pub records: Vec<String>,
}

impl IgnoreConfig {
    /// Check if a record should be suppressed.
    pub fn should_ignore_record(&self, record_id: &str) -> bool {
        self.records.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, record_id)
            } else {
                pattern == record_id
            }
        })
    }
}

/// Simple glob matching (supports * as wildcard).
fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    let mut remaining = text;

    // Check prefix (before first *)
    if !parts[0].is_empty() {
        if !remaining.starts_with(parts[0]) {
            return false;
        }
        remaining = &remaining[parts[0].len()..];
    }

    // Check suffix (after last *)
    let last_part = parts[parts.len() - 1];
    if !last_part.is_empty() {
        if !remaining.ends_with(last_part) {
            return false;
        }
        remaining = &remaining[..remaining.len() - last_part.len()];
    }

    // Check middle parts
    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        if let Some(pos) = remaining.find(part) {
            remaining = &remaining[pos + part.len()..];
        } else {
            return false;
        }
    }

    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cve_dir: PathBuf::from("cves"),
            registry_path: PathBuf::from("registry.json"),
            output_dir: PathBuf::from("matched"),
            policy: MatchPolicy::Exact,
            vendor_keyword: "tensorflow".to_string(),
            default_format: "table".to_string(),
            ignore: IgnoreConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cvesift")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    ///
    /// This is useful for showing users what the default config looks like.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

//! Configuration loading
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. `flowkit.toml` in the working directory, or the file given by
//!    `--config` / `FLOWKIT_CONFIG_PATH`
//! 3. `FLOWKIT_*` environment variables, `__` separating sections
//!    (e.g. `FLOWKIT_SCAN__MISSING=tolerate`)
//!
//! A `.env` file is loaded into the environment first when present.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;
use config::{Environment, File};
use serde::{Deserialize, Serialize};

use crate::scan::{Missing, ScanOptions};

/// How records in a scanned file are encoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    /// One text record per line
    #[default]
    Lines,
    /// One JSON document per line
    Jsonl,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub missing: Missing,
    #[serde(default)]
    pub format: RecordFormat,
    /// Stop after this many records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load from the default search locations
    pub fn load() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Options for resource scans
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            missing: self.scan.missing,
        }
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

/// Builder for loading a `Config` with explicit overrides
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_path: Option<PathBuf>,
    skip_env: bool,
}

impl ConfigBuilder {
    /// Config file path (overrides default search)
    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Skip `.env` and `FLOWKIT_*` variables
    pub fn without_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    pub fn build(self) -> Result<Config> {
        let use_env = !self.skip_env;
        if use_env {
            dotenvy::dotenv().ok();
        }

        let path = self.config_path.or_else(|| {
            use_env
                .then(|| std::env::var("FLOWKIT_CONFIG_PATH").ok().map(PathBuf::from))
                .flatten()
        });

        let mut builder = config::Config::builder();
        builder = match &path {
            Some(path) => builder.add_source(File::from(path.as_path()).required(true)),
            None => builder.add_source(File::with_name("flowkit").required(false)),
        };
        if use_env {
            builder = builder.add_source(
                Environment::with_prefix("FLOWKIT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config: Config = builder
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Invalid configuration")?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(contents: &str) -> PathBuf {
        let name = format!("flowkit-{}.toml", uuid::Uuid::new_v4());
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).expect("Failed to write config file");
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.scan.missing, Missing::Fail);
        assert_eq!(config.scan.format, RecordFormat::Lines);
        assert_eq!(config.log.filter, "warn");
        assert_eq!(config.scan_options(), ScanOptions::default());
    }

    #[test]
    fn test_load_from_file() {
        let path = write_config(
            r#"
[scan]
missing = "tolerate"
format = "jsonl"
limit = 5

[log]
filter = "flowkit=debug"
"#,
        );

        let config = Config::builder()
            .config_path(Some(path.clone()))
            .without_env()
            .build()
            .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.scan.missing, Missing::Tolerate);
        assert_eq!(config.scan.format, RecordFormat::Jsonl);
        assert_eq!(config.scan.limit, Some(5));
        assert_eq!(config.log.filter, "flowkit=debug");
        assert_eq!(config.scan_options(), ScanOptions::default().tolerate_missing());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = write_config("[scan]\nformat = \"jsonl\"\n");
        let config = Config::builder()
            .config_path(Some(path.clone()))
            .without_env()
            .build()
            .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.scan.missing, Missing::Fail);
        assert_eq!(config.scan.format, RecordFormat::Jsonl);
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let name = format!("flowkit-{}.toml", uuid::Uuid::new_v4());
        let path = std::env::temp_dir().join(name);
        let result = Config::builder()
            .config_path(Some(path))
            .without_env()
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.scan.limit = Some(3);
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("missing = \"fail\""));
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}

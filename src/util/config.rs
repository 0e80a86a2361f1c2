//! Configuration file support for sigbuild.
//!
//! Two configuration file locations are read:
//! - Global: `<user config dir>/config.toml` - user-wide defaults
//! - Project: `.sigbuild/config.toml` - overrides for one project
//!
//! Project config takes precedence over global config, and command line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Manifest file name used when nothing else is configured.
pub const DEFAULT_MANIFEST: &str = "sigbuild.json";

/// sigbuild tool configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildSettings,

    /// Log settings
    pub log: LogSettings,
}

/// `[build]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Manifest to load when none is given on the command line
    pub manifest: Option<PathBuf>,

    /// Target to build when neither the command line nor the manifest names one
    pub target: Option<String>,
}

/// `[log]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` filter directive, e.g. `sigbuild=debug`
    pub filter: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.manifest.is_some() {
            self.build.manifest = other.build.manifest;
        }
        if other.build.target.is_some() {
            self.build.target = other.build.target;
        }
        if other.log.filter.is_some() {
            self.log.filter = other.log.filter;
        }
    }

    /// The manifest to use when the command line does not name one.
    pub fn manifest_path(&self) -> PathBuf {
        self.build
            .manifest
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST))
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.sigbuild/config.toml)
/// 2. Global config
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

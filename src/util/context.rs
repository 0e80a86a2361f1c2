//! Global context for sigbuild operations.
//!
//! Provides centralized access to the invocation directory and the
//! locations of the tool configuration files.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::util::config::{load_config, Config};

/// Project directories for sigbuild
static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("com", "sigbuild", "sigbuild"));

/// Name of the per-project settings directory.
pub const PROJECT_DIR_NAME: &str = ".sigbuild";

/// Global context containing the invocation directory and settings paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Directory sigbuild was started in
    cwd: PathBuf,

    /// Directory holding the global config.toml, if the platform has one
    config_dir: Option<PathBuf>,

    /// Whether to use verbose output
    verbose: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext for the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a context rooted at a specific directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let config_dir = PROJECT_DIRS
            .as_ref()
            .map(|dirs| dirs.config_dir().to_path_buf());

        GlobalContext {
            cwd,
            config_dir,
            verbose: false,
        }
    }

    /// Override the global config directory.
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Check if verbose mode is on.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Get the invocation directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the global config file path.
    pub fn global_config_path(&self) -> Option<PathBuf> {
        self.config_dir.as_ref().map(|d| d.join("config.toml"))
    }

    /// Get the project config file path.
    pub fn project_config_path(&self) -> PathBuf {
        self.cwd.join(PROJECT_DIR_NAME).join("config.toml")
    }

    /// Load the merged global and project configuration.
    pub fn config(&self) -> Config {
        load_config(
            self.global_config_path().as_deref(),
            &self.project_config_path(),
        )
    }

    /// Resolve a manifest argument against the invocation directory.
    pub fn manifest_path(&self, manifest: &Path) -> PathBuf {
        if manifest.is_absolute() {
            manifest.to_path_buf()
        } else {
            self.cwd.join(manifest)
        }
    }
}

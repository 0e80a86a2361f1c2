//! The loaded build configuration.
//!
//! A [`Configuration`] is produced by the loader with every string already
//! variable-resolved, and owns its whole target tree.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::target::BuildTarget;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// A fully loaded manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Display name
    pub name: Option<String>,
    /// Base directory for targets without their own `dir`
    pub working_directory: PathBuf,
    /// Where subprocess output is written instead of stdout
    pub log_file: Option<PathBuf>,
    /// Target built when none is requested
    pub default_target: Option<String>,
    /// Variable definitions from `vars`, sorted by name
    pub variables: Vec<(String, String)>,
    /// Targets in manifest order
    pub targets: Vec<BuildTarget>,
}

/// Failure to pick a target from a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("target `{name}` not found in configuration")]
    NotFound { name: String, available: Vec<String> },

    #[error("no target specified and configuration has no `default_target`")]
    NoTarget,
}

impl SelectError {
    /// Render with the available targets and a suggested fix.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            SelectError::NotFound { available, .. } => {
                let listing = if available.is_empty() {
                    "configuration defines no targets".to_string()
                } else {
                    format!("available targets: {}", available.join(", "))
                };
                Diagnostic::error(self.to_string())
                    .with_context(listing)
                    .with_suggestion(suggestions::TARGET_NOT_FOUND)
            }
            SelectError::NoTarget => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::NO_TARGET)
            }
        }
    }
}

impl Configuration {
    /// Create an empty configuration rooted at `working_directory`.
    pub fn new(working_directory: impl Into<PathBuf>) -> Self {
        Configuration {
            name: None,
            working_directory: working_directory.into(),
            log_file: None,
            default_target: None,
            variables: Vec::new(),
            targets: Vec::new(),
        }
    }

    /// Find a target by name.
    pub fn target(&self, name: &str) -> Option<&BuildTarget> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Target names in manifest order.
    pub fn target_names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.name.as_str()).collect()
    }

    /// Pick the target to build.
    ///
    /// An explicit request wins, then `default_target`, then `fallback`
    /// (the tool configuration's default).
    pub fn select_target(
        &self,
        requested: Option<&str>,
        fallback: Option<&str>,
    ) -> Result<&BuildTarget, SelectError> {
        let name = requested
            .or(self.default_target.as_deref())
            .or(fallback)
            .ok_or(SelectError::NoTarget)?;

        self.target(name).ok_or_else(|| SelectError::NotFound {
            name: name.to_string(),
            available: self.target_names().into_iter().map(String::from).collect(),
        })
    }
}

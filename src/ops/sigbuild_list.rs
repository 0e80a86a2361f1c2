//! Implementation of `sigbuild list`.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::{Configuration, ConfigurationLoader, JsonFormat, Session, TargetKind};
use crate::ops::sigbuild_build::canonical_manifest;
use crate::util::fs::RealFileSystem;

/// One row of the target listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEntry {
    pub name: String,
    pub kind: TargetKind,
    pub is_default: bool,
}

/// Targets of a manifest, in manifest order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetListing {
    pub name: Option<String>,
    pub targets: Vec<TargetEntry>,
}

impl TargetListing {
    fn from_configuration(config: &Configuration) -> Self {
        let default = config.default_target.as_deref();
        TargetListing {
            name: config.name.clone(),
            targets: config
                .targets
                .iter()
                .map(|t| TargetEntry {
                    name: t.name.clone(),
                    kind: t.kind,
                    is_default: Some(t.name.as_str()) == default,
                })
                .collect(),
        }
    }

    /// Render as aligned text, one target per line.
    pub fn format(&self) -> String {
        let width = self.targets.iter().map(|t| t.name.len()).max().unwrap_or(0);
        let mut out = String::new();

        if let Some(ref name) = self.name {
            let _ = writeln!(out, "{}", name);
        }
        if self.targets.is_empty() {
            out.push_str("  (no targets)\n");
        }
        for target in &self.targets {
            let _ = writeln!(
                out,
                "  {:<width$}  {}{}",
                target.name,
                target.kind,
                if target.is_default { "  (default)" } else { "" },
                width = width
            );
        }

        out
    }
}

/// Load a manifest and list its targets.
pub fn list(manifest: &Path) -> Result<TargetListing> {
    let manifest = canonical_manifest(manifest)?;
    let mut session = Session::new();

    let config = ConfigurationLoader::new(&RealFileSystem, &JsonFormat)
        .load(&mut session, &manifest)
        .with_context(|| format!("failed to load {}", manifest.display()))?;
    let listing = TargetListing::from_configuration(session.install(config));

    session.dispose();
    Ok(listing)
}

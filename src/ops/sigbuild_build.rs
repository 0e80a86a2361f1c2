//! Implementation of `sigbuild build`.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::{BuildReport, TargetBuilder};
use crate::core::{Configuration, ConfigurationLoader, JsonFormat, LoaderError, Session};
use crate::util::diagnostic::Diagnostic;
use crate::util::fs::{CwdGuard, RealFileSystem};
use crate::util::process::ProcessRunner;

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Manifest to load
    pub manifest: PathBuf,

    /// Target requested on the command line
    pub target: Option<String>,

    /// Target from the tool configuration, used when neither the command
    /// line nor the manifest names one
    pub fallback_target: Option<String>,
}

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// Display name of the configuration, if it has one
    pub configuration: Option<String>,
    pub report: BuildReport,
    /// Warnings recorded while loading the manifest
    pub warnings: Vec<Diagnostic>,
}

/// Load `opts.manifest` and build one of its targets.
///
/// The process working directory is switched to the manifest's directory
/// for the duration of the build and restored afterwards.
pub fn build(opts: &BuildOptions, runner: &dyn ProcessRunner) -> Result<BuildOutcome> {
    let manifest = canonical_manifest(&opts.manifest)?;
    let dir = manifest.parent().unwrap_or(Path::new("."));
    let _cwd = CwdGuard::enter(dir)?;

    let mut session = Session::new();
    let result = build_in_session(&mut session, opts, &manifest, runner);
    session.dispose();
    tracing::debug!("cleanup completed");

    result
}

fn build_in_session(
    session: &mut Session,
    opts: &BuildOptions,
    manifest: &Path,
    runner: &dyn ProcessRunner,
) -> Result<BuildOutcome> {
    let config = ConfigurationLoader::new(&RealFileSystem, &JsonFormat)
        .load(session, manifest)
        .with_context(|| format!("failed to load {}", manifest.display()))?;
    let warnings = session.diagnostics().to_vec();
    let config = session.install(config);

    let target = config.select_target(opts.target.as_deref(), opts.fallback_target.as_deref())?;
    let mut log = open_log(config)?;

    let report = TargetBuilder::new(runner, &RealFileSystem, &mut *log)
        .build(target)
        .with_context(|| format!("build target `{}` failed", target.name))?;

    Ok(BuildOutcome {
        configuration: config.name.clone(),
        report,
        warnings,
    })
}

/// Check that the manifest exists and make its path absolute.
pub fn canonical_manifest(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(LoaderError::FileNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }

    path.canonicalize()
        .with_context(|| format!("failed to resolve {}", path.display()))
}

/// The stream subprocess output is written to.
fn open_log(config: &Configuration) -> Result<Box<dyn Write>> {
    match config.log_file {
        Some(ref path) => {
            tracing::debug!("writing build output to {}", path.display());
            let file = File::create(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

//! Filesystem utilities.
//!
//! [`FileSystem`] is the capability the loader and builder use for every
//! file and working-directory operation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Capability for file reads, directory creation and the working directory
/// query.
pub trait FileSystem {
    /// Read a whole file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Create a directory and all missing parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Query the current working directory.
    fn current_dir(&self) -> io::Result<PathBuf>;
}

/// [`FileSystem`] backed by `std::fs` and the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }
}

/// Restores the working directory captured at construction when dropped.
#[derive(Debug)]
pub struct CwdGuard {
    original: PathBuf,
}

impl CwdGuard {
    /// Change into `dir`, remembering the current directory.
    pub fn enter(dir: &Path) -> Result<Self> {
        let original = std::env::current_dir().context("failed to get current directory")?;
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
        tracing::debug!("changed working directory to {}", dir.display());
        Ok(CwdGuard { original })
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.original) {
            tracing::error!(
                "failed to change directory back to {}: {}",
                self.original.display(),
                e
            );
        }
    }
}

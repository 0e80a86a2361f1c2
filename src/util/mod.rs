//! Shared utilities

pub mod config;
pub mod context;
pub mod diagnostic;
pub mod fs;
pub mod process;

pub use config::Config;
pub use context::GlobalContext;
pub use diagnostic::Diagnostic;
pub use fs::{FileSystem, RealFileSystem};
pub use process::{CommandSpec, ProcessOutput, ProcessRunner, SystemRunner};

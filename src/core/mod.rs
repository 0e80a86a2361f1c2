//! Core data structures for sigbuild.
//!
//! - Variable table and placeholder substitution
//! - Build targets and the loaded configuration
//! - The manifest loader
//! - The per-run session

pub mod loader;
pub mod manifest;
pub mod session;
pub mod target;
pub mod variables;

pub use loader::{ConfigurationLoader, JsonFormat, LoaderError, ManifestFormat};
pub use manifest::{Configuration, SelectError};
pub use session::Session;
pub use target::{BuildTarget, CompileSpec, TargetAction, TargetKind};
pub use variables::VariableTable;

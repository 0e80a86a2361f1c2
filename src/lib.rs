//! sigbuild - a JSON-driven build runner for C projects
//!
//! This crate provides the library behind the `sigbuild` binary: manifest
//! loading with `{variable}` substitution, and a builder that compiles and
//! links a target or runs its shell commands.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for sigbuild unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides mock implementations of the filesystem and
/// process capabilities.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildError, BuildReport, TargetBuilder};
pub use core::{
    BuildTarget, Configuration, ConfigurationLoader, LoaderError, SelectError, Session,
    VariableTable,
};
pub use util::context::GlobalContext;

/// Release line reported by `sigbuild about`.
pub const RELEASE: &str = "0.00.03.001";

/// Version of the manifest loader.
pub const LOADER_VERSION: &str = "0.00.02";

/// Version of the target builder.
pub const BUILDER_VERSION: &str = "0.00.01";

/// The release line without its build number, e.g. `0.00.03`.
pub fn short_release() -> &'static str {
    RELEASE.rsplit_once('.').map_or(RELEASE, |(head, _)| head)
}

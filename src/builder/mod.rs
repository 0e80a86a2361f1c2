//! Target builder.
//!
//! Turns a resolved target into compiler, linker or shell invocations and
//! runs them.

pub mod executor;
pub mod toolchain;

pub use executor::{BuildError, BuildReport, TargetBuilder};
pub use toolchain::{CompilerFamily, GnuToolchain, MsvcToolchain, Toolchain};

//! High-level operations.
//!
//! This module contains the implementation of sigbuild commands.

pub mod sigbuild_build;
pub mod sigbuild_list;

pub use sigbuild_build::{build, BuildOptions, BuildOutcome};
pub use sigbuild_list::{list, TargetEntry, TargetListing};

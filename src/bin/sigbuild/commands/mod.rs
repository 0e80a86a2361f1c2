//! Command implementations

pub mod about;
pub mod build;
pub mod completions;
pub mod list;

//! Target definitions - what gets built.
//!
//! A target is either an operation (an ordered list of shell commands) or
//! a compilable unit (sources compiled one by one, then linked).

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The kind of target, from the manifest's `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Runs shell commands (`"op"`)
    Operation,
    /// Executable binary (`"exe"`)
    Executable,
    /// Library (`"lib"`)
    Library,
}

impl TargetKind {
    /// The manifest tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Operation => "op",
            TargetKind::Executable => "exe",
            TargetKind::Library => "lib",
        }
    }

    /// Check if targets of this kind are compiled and linked.
    pub fn is_compilable(&self) -> bool {
        !matches!(self, TargetKind::Operation)
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "op" => Ok(TargetKind::Operation),
            "exe" => Ok(TargetKind::Executable),
            "lib" => Ok(TargetKind::Library),
            _ => Err(format!(
                "unknown target type `{}`; expected `op`, `exe` or `lib`",
                s
            )),
        }
    }
}

/// Compile and link settings of an `exe`/`lib` target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileSpec {
    /// Source files, compiled in this order
    pub sources: Vec<String>,
    /// Compiler command name or path, also used as the link driver
    pub compiler: String,
    /// Flags passed to every compile step
    pub compiler_flags: Vec<String>,
    /// Flags passed to the link step
    pub linker_flags: Vec<String>,
    /// Where object files are written
    pub build_directory: PathBuf,
    /// Where the linked artifact is written
    pub output_directory: PathBuf,
    /// File name of the linked artifact
    pub output_name: String,
}

impl CompileSpec {
    /// Path of the linked artifact.
    pub fn output_path(&self) -> PathBuf {
        self.output_directory.join(&self.output_name)
    }
}

/// What building a target does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetAction {
    /// Shell commands for the host platform, run in order
    Commands(Vec<String>),
    /// Compile every source, then link
    Compile(CompileSpec),
}

/// A fully resolved build target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    pub name: String,
    pub kind: TargetKind,
    /// Directory the target's processes run in
    pub working_directory: PathBuf,
    pub action: TargetAction,
}

impl BuildTarget {
    /// Create an operation target.
    pub fn operation(
        name: impl Into<String>,
        working_directory: impl Into<PathBuf>,
        commands: Vec<String>,
    ) -> Self {
        BuildTarget {
            name: name.into(),
            kind: TargetKind::Operation,
            working_directory: working_directory.into(),
            action: TargetAction::Commands(commands),
        }
    }

    /// Create a compilable target.
    pub fn compiled(
        name: impl Into<String>,
        kind: TargetKind,
        working_directory: impl Into<PathBuf>,
        spec: CompileSpec,
    ) -> Self {
        BuildTarget {
            name: name.into(),
            kind,
            working_directory: working_directory.into(),
            action: TargetAction::Compile(spec),
        }
    }

    /// Commands of an operation target; empty otherwise.
    pub fn commands(&self) -> &[String] {
        match &self.action {
            TargetAction::Commands(commands) => commands,
            TargetAction::Compile(_) => &[],
        }
    }

    /// Compile settings of an `exe`/`lib` target.
    pub fn compile_spec(&self) -> Option<&CompileSpec> {
        match &self.action {
            TargetAction::Compile(spec) => Some(spec),
            TargetAction::Commands(_) => None,
        }
    }

    /// Source files; empty for operation targets.
    pub fn sources(&self) -> &[String] {
        self.compile_spec()
            .map(|s| s.sources.as_slice())
            .unwrap_or_default()
    }

    /// Compiler; `None` for operation targets.
    pub fn compiler(&self) -> Option<&str> {
        self.compile_spec().map(|s| s.compiler.as_str())
    }

    /// Compiler flags; empty for operation targets.
    pub fn compiler_flags(&self) -> &[String] {
        self.compile_spec()
            .map(|s| s.compiler_flags.as_slice())
            .unwrap_or_default()
    }

    /// Linker flags; empty for operation targets.
    pub fn linker_flags(&self) -> &[String] {
        self.compile_spec()
            .map(|s| s.linker_flags.as_slice())
            .unwrap_or_default()
    }

    /// Object file directory; `None` for operation targets.
    pub fn build_directory(&self) -> Option<&Path> {
        self.compile_spec().map(|s| s.build_directory.as_path())
    }
}

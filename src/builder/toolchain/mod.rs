//! Toolchain abstraction for compile and link commands.
//!
//! The compiler named in a target doubles as the link driver. Its family
//! (GNU-style or MSVC) is inferred from the program name and decides the
//! argument syntax.

use std::path::{Component, Path, PathBuf};

use crate::util::process::CommandSpec;

mod gcc;
mod msvc;

pub use gcc::GnuToolchain;
pub use msvc::MsvcToolchain;

/// File extension of object files on the host platform.
#[cfg(windows)]
pub const OBJECT_EXTENSION: &str = "obj";
#[cfg(not(windows))]
pub const OBJECT_EXTENSION: &str = "o";

/// Input for a compile step.
#[derive(Debug, Clone)]
pub struct CompileInput {
    /// Source file to compile
    pub source: PathBuf,
    /// Output object file
    pub output: PathBuf,
    /// Compiler flags, passed before the source
    pub cflags: Vec<String>,
}

/// Input for a link step.
#[derive(Debug, Clone)]
pub struct LinkInput {
    /// Object files to link, in compile order
    pub objects: Vec<PathBuf>,
    /// Output artifact
    pub output: PathBuf,
    /// Linker flags, passed after the objects
    pub ldflags: Vec<String>,
}

/// Argument syntax of a compiler driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerFamily {
    /// gcc, clang, cc and anything else accepting `-c`/`-o`
    Gnu,
    /// Microsoft `cl.exe`
    Msvc,
}

impl CompilerFamily {
    /// Infer the family from a compiler name or path.
    pub fn detect(compiler: &str) -> Self {
        let stem = Path::new(compiler)
            .file_stem()
            .map(|s| s.to_string_lossy().to_ascii_lowercase());

        match stem.as_deref() {
            Some("cl") => CompilerFamily::Msvc,
            _ => CompilerFamily::Gnu,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompilerFamily::Gnu => "gnu",
            CompilerFamily::Msvc => "msvc",
        }
    }
}

/// Generates the commands for one compiler driver.
pub trait Toolchain {
    fn family(&self) -> CompilerFamily;

    /// Program run for both compile and link steps.
    fn compiler_path(&self) -> &Path;

    /// Command compiling one source into one object.
    fn compile_command(&self, input: &CompileInput) -> CommandSpec;

    /// Command linking all objects into the output artifact.
    fn link_command(&self, input: &LinkInput) -> CommandSpec;
}

/// Toolchain for `compiler`, invoked as `program`.
///
/// `program` is usually the compiler resolved on PATH; `compiler` is the
/// name written in the manifest.
pub fn for_compiler(compiler: &str, program: PathBuf) -> Box<dyn Toolchain> {
    match CompilerFamily::detect(compiler) {
        CompilerFamily::Gnu => Box::new(GnuToolchain::new(program)),
        CompilerFamily::Msvc => Box::new(MsvcToolchain::new(program)),
    }
}

/// Object file for `source` inside `build_dir`.
///
/// The source path's components, minus `.` and any root, are joined with
/// `_` and only the source's own extension is swapped, so `src/util/io.c`
/// becomes `<build_dir>/src_util_io.o` and `v1.2/x.c` becomes
/// `<build_dir>/v1.2_x.o`.
pub fn object_path(build_dir: &Path, source: &str) -> PathBuf {
    let path = Path::new(source);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut parts: Vec<String> = path
        .parent()
        .map(|parent| {
            parent
                .components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    Component::ParentDir => Some("..".to_string()),
                    Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
                })
                .collect()
        })
        .unwrap_or_default();
    parts.push(stem);

    build_dir.join(format!("{}.{}", parts.join("_"), OBJECT_EXTENSION))
}

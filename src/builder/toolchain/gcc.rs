//! GNU-style toolchain (GCC, Clang and compatible drivers).

use std::path::{Path, PathBuf};

use super::{CommandSpec, CompileInput, CompilerFamily, LinkInput, Toolchain};

/// Driver accepting `-c` and `-o`.
#[derive(Debug, Clone)]
pub struct GnuToolchain {
    cc: PathBuf,
}

impl GnuToolchain {
    pub fn new(cc: PathBuf) -> Self {
        GnuToolchain { cc }
    }
}

impl Toolchain for GnuToolchain {
    fn family(&self) -> CompilerFamily {
        CompilerFamily::Gnu
    }

    fn compiler_path(&self) -> &Path {
        &self.cc
    }

    fn compile_command(&self, input: &CompileInput) -> CommandSpec {
        CommandSpec::new(&self.cc)
            .arg("-c")
            .args(input.cflags.iter().cloned())
            .arg(input.source.display().to_string())
            .arg("-o")
            .arg(input.output.display().to_string())
    }

    fn link_command(&self, input: &LinkInput) -> CommandSpec {
        CommandSpec::new(&self.cc)
            .arg("-o")
            .arg(input.output.display().to_string())
            .args(input.objects.iter().map(|o| o.display().to_string()))
            .args(input.ldflags.iter().cloned())
    }
}

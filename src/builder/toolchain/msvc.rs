//! MSVC toolchain implementation.

use std::path::{Path, PathBuf};

use super::{CommandSpec, CompileInput, CompilerFamily, LinkInput, Toolchain};

/// MSVC toolchain (Windows). `cl.exe` compiles and drives the linker.
#[derive(Debug, Clone)]
pub struct MsvcToolchain {
    /// Path to cl.exe
    pub cl: PathBuf,
}

impl MsvcToolchain {
    pub fn new(cl: PathBuf) -> Self {
        MsvcToolchain { cl }
    }
}

impl Toolchain for MsvcToolchain {
    fn family(&self) -> CompilerFamily {
        CompilerFamily::Msvc
    }

    fn compiler_path(&self) -> &Path {
        &self.cl
    }

    fn compile_command(&self, input: &CompileInput) -> CommandSpec {
        CommandSpec::new(&self.cl)
            .arg("/c")
            .args(input.cflags.iter().cloned())
            .arg(input.source.display().to_string())
            .arg(format!("/Fo{}", input.output.display()))
    }

    fn link_command(&self, input: &LinkInput) -> CommandSpec {
        CommandSpec::new(&self.cl)
            .args(input.objects.iter().map(|o| o.display().to_string()))
            .arg(format!("/Fe{}", input.output.display()))
            .args(input.ldflags.iter().cloned())
    }
}

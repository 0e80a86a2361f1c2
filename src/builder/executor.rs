//! Target execution.
//!
//! Runs one resolved [`BuildTarget`]: either its shell commands in order,
//! or one compile per source followed by a single link. Every step is
//! synchronous and the first failure stops the target.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::builder::toolchain::{self, object_path, CompileInput, LinkInput};
use crate::core::target::{BuildTarget, CompileSpec, TargetAction};
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::fs::FileSystem;
use crate::util::process::{find_executable, shell_command, CommandSpec, ProcessRunner};

/// Errors produced while building a target.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to create directory {}", .path.display())]
    Prepare {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("compiling `{file}` failed{}", exit_suffix(.status))]
    CompileFailed { file: String, status: Option<i32> },

    #[error("linking `{}` failed{}", .output.display(), exit_suffix(.status))]
    LinkFailed {
        output: PathBuf,
        status: Option<i32>,
    },

    #[error("command `{command}` failed{}", exit_suffix(.status))]
    CommandFailed {
        command: String,
        status: Option<i32>,
    },
}

fn exit_suffix(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!(" with exit status {}", code),
        None => String::new(),
    }
}

impl BuildError {
    /// Exit status of the failing process, if it ran to completion.
    pub fn status(&self) -> Option<i32> {
        match self {
            BuildError::Prepare { .. } => None,
            BuildError::CompileFailed { status, .. }
            | BuildError::LinkFailed { status, .. }
            | BuildError::CommandFailed { status, .. } => *status,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            BuildError::Prepare { source, .. } => diag.with_context(source.to_string()),
            _ => diag.with_suggestion(suggestions::BUILD_FAILED),
        }
    }
}

/// What a successful build did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub target: String,
    /// Object files, in compile order
    pub objects: Vec<PathBuf>,
    /// Linked artifact
    pub artifact: Option<PathBuf>,
    /// Shell commands run, for operation targets
    pub commands: Vec<String>,
}

/// Builds targets through injected process and filesystem capabilities.
///
/// Subprocess output is copied verbatim to `log`.
pub struct TargetBuilder<'a> {
    runner: &'a dyn ProcessRunner,
    fs: &'a dyn FileSystem,
    log: &'a mut dyn Write,
}

impl<'a> TargetBuilder<'a> {
    pub fn new(
        runner: &'a dyn ProcessRunner,
        fs: &'a dyn FileSystem,
        log: &'a mut dyn Write,
    ) -> Self {
        TargetBuilder { runner, fs, log }
    }

    /// Build one target.
    pub fn build(&mut self, target: &BuildTarget) -> Result<BuildReport, BuildError> {
        tracing::info!("Building {} ({})", target.name, target.kind);

        let report = match &target.action {
            TargetAction::Commands(commands) => self.run_commands(target, commands)?,
            TargetAction::Compile(spec) => self.compile_and_link(target, spec)?,
        };

        if let Err(e) = self.log.flush() {
            tracing::warn!("failed to flush build log: {}", e);
        }
        Ok(report)
    }

    fn run_commands(
        &mut self,
        target: &BuildTarget,
        commands: &[String],
    ) -> Result<BuildReport, BuildError> {
        for command in commands {
            tracing::info!("Running {}", command);
            let spec = shell_command(command).cwd(&target.working_directory);
            self.run_step(&spec)
                .map_err(|status| BuildError::CommandFailed {
                    command: command.clone(),
                    status,
                })?;
        }

        Ok(BuildReport {
            target: target.name.clone(),
            commands: commands.to_vec(),
            ..BuildReport::default()
        })
    }

    fn compile_and_link(
        &mut self,
        target: &BuildTarget,
        spec: &CompileSpec,
    ) -> Result<BuildReport, BuildError> {
        let work = &target.working_directory;

        for dir in [&spec.build_directory, &spec.output_directory] {
            let path = work.join(dir);
            self.fs
                .create_dir_all(&path)
                .map_err(|source| BuildError::Prepare { path, source })?;
        }

        let program = resolve_compiler(&spec.compiler, work);
        let toolchain = toolchain::for_compiler(&spec.compiler, program);
        tracing::debug!(
            "using {} ({})",
            toolchain.compiler_path().display(),
            toolchain.family().as_str()
        );

        let mut objects = Vec::with_capacity(spec.sources.len());
        for source in &spec.sources {
            tracing::info!("Compiling {}", source);
            let object = object_path(&spec.build_directory, source);
            let cmd = toolchain
                .compile_command(&CompileInput {
                    source: PathBuf::from(source),
                    output: object.clone(),
                    cflags: spec.compiler_flags.clone(),
                })
                .cwd(work);

            self.run_step(&cmd)
                .map_err(|status| BuildError::CompileFailed {
                    file: source.clone(),
                    status,
                })?;
            objects.push(object);
        }

        let output = spec.output_path();
        tracing::info!("Linking {}", output.display());
        let cmd = toolchain
            .link_command(&LinkInput {
                objects: objects.clone(),
                output: output.clone(),
                ldflags: spec.linker_flags.clone(),
            })
            .cwd(work);

        self.run_step(&cmd)
            .map_err(|status| BuildError::LinkFailed {
                output: output.clone(),
                status,
            })?;

        Ok(BuildReport {
            target: target.name.clone(),
            objects,
            artifact: Some(output),
            commands: Vec::new(),
        })
    }

    /// Run one process, forwarding its output. `Err` carries the exit
    /// status, `None` when the process could not be run.
    fn run_step(&mut self, cmd: &CommandSpec) -> Result<(), Option<i32>> {
        let output = match self.runner.run(cmd) {
            Ok(output) => output,
            Err(e) => {
                tracing::error!("{:#}", e);
                return Err(None);
            }
        };

        for stream in [&output.stdout, &output.stderr] {
            if let Err(e) = self.log.write_all(stream) {
                tracing::warn!("failed to write build log: {}", e);
            }
        }

        if output.success() {
            Ok(())
        } else {
            Err(output.status)
        }
    }
}

/// Program for `compiler`. A bare name is looked up on PATH and used
/// verbatim when not found; a path is taken relative to `work`, the
/// directory the compile steps run in.
fn resolve_compiler(compiler: &str, work: &Path) -> PathBuf {
    let path = Path::new(compiler);
    if path.components().count() > 1 {
        return work.join(path);
    }
    find_executable(compiler).unwrap_or_else(|| PathBuf::from(compiler))
}

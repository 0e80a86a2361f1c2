//! Test utilities and mocks for sigbuild unit tests.
//!
//! Provides in-memory implementations of the [`FileSystem`] and
//! [`ProcessRunner`] capabilities so the loader and builder can be tested
//! without touching the disk or spawning compilers.
//!
//! # Example
//!
//! ```rust,ignore
//! use sigbuild::test_support::{MockFileSystem, MockExecutor, MockProcessOutput};
//!
//! #[test]
//! fn test_example() {
//!     let mut fs = MockFileSystem::new();
//!     fs.add_file("/project/sigbuild.json", r#"{"targets": []}"#);
//!
//!     let exec = MockExecutor::new();
//!     exec.expect_prefix("gcc -c", MockProcessOutput::success(""));
//!
//!     // Use mocks in tests...
//! }
//! ```

pub mod fixtures;

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::util::fs::FileSystem;
use crate::util::process::{CommandSpec, ProcessOutput, ProcessRunner};

// Re-export fixtures for convenience
pub use fixtures::*;

/// Mock filesystem for testing without real I/O.
///
/// Files and the working directory are fixed at setup; directories can
/// be created through the [`FileSystem`] trait.
#[derive(Debug, Default)]
pub struct MockFileSystem {
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: Mutex<Vec<PathBuf>>,
    cwd: PathBuf,
    fail_create: Vec<PathBuf>,
}

impl MockFileSystem {
    /// Create a new empty mock filesystem rooted at `/`.
    pub fn new() -> Self {
        MockFileSystem {
            files: HashMap::new(),
            dirs: Mutex::new(Vec::new()),
            cwd: PathBuf::from("/"),
            fail_create: Vec::new(),
        }
    }

    /// Set the working directory reported by `current_dir`.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    /// Make `create_dir_all` fail for this path.
    pub fn fail_create_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.fail_create.push(path.into());
        self
    }

    /// Add a file with the given content.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.files.insert(path, content.into());
    }

    /// Add a directory and all of its parents.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut dirs = self.dirs.lock().unwrap();
        for ancestor in path.as_ref().ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            if !dirs.iter().any(|d| d == ancestor) {
                dirs.push(ancestor.to_path_buf());
            }
        }
    }

    /// Check if a directory exists.
    pub fn is_dir(&self, path: &Path) -> bool {
        self.dirs.lock().unwrap().iter().any(|d| d == path)
    }
}

impl FileSystem for MockFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )
        })
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        if self.fail_create.iter().any(|p| p == path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            ));
        }
        self.add_dir(path);
        Ok(())
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        Ok(self.cwd.clone())
    }
}

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

impl Default for MockProcessOutput {
    fn default() -> Self {
        MockProcessOutput::success("")
    }
}

impl From<MockProcessOutput> for ProcessOutput {
    fn from(output: MockProcessOutput) -> Self {
        ProcessOutput {
            status: Some(output.status),
            stdout: output.stdout.into_bytes(),
            stderr: output.stderr.into_bytes(),
        }
    }
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
    /// Match using a regex pattern.
    Regex(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Regex(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(cmd))
                .unwrap_or(false),
            CommandPattern::Any => true,
        }
    }
}

/// Expectation for a command execution.
#[derive(Debug, Clone)]
pub struct CommandExpectation {
    /// Pattern to match against commands.
    pub pattern: CommandPattern,
    /// Output to return when matched.
    pub output: MockProcessOutput,
    /// Number of times this expectation can be used (None = unlimited).
    pub times: Option<usize>,
    /// Number of times this expectation has been used.
    pub used: usize,
}

impl CommandExpectation {
    /// Create a new expectation.
    pub fn new(pattern: CommandPattern, output: MockProcessOutput) -> Self {
        CommandExpectation {
            pattern,
            output,
            times: None,
            used: 0,
        }
    }

    /// Set the number of times this expectation can be used.
    pub fn times(mut self, n: usize) -> Self {
        self.times = Some(n);
        self
    }

    /// Check if this expectation can still be used.
    pub fn available(&self) -> bool {
        match self.times {
            Some(n) => self.used < n,
            None => true,
        }
    }
}

#[derive(Debug, Default)]
struct ExecutorState {
    expectations: Vec<CommandExpectation>,
    calls: Vec<CommandSpec>,
    default_output: Option<MockProcessOutput>,
}

/// Mock process runner for testing command execution.
///
/// Commands are matched by their display form (`program arg1 arg2 ...`).
/// A command matching no expectation, with no default set, fails as if
/// the program could not be spawned.
#[derive(Debug, Default)]
pub struct MockExecutor {
    state: Mutex<ExecutorState>,
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        MockExecutor::default()
    }

    /// Add a custom expectation.
    pub fn expect_pattern(&self, expectation: CommandExpectation) -> &Self {
        self.state.lock().unwrap().expectations.push(expectation);
        self
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&self, cmd: &str, output: MockProcessOutput) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Exact(cmd.to_string()),
            output,
        ))
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&self, prefix: &str, output: MockProcessOutput) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::StartsWith(prefix.to_string()),
            output,
        ))
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&self, substring: &str, output: MockProcessOutput) -> &Self {
        self.expect_pattern(CommandExpectation::new(
            CommandPattern::Contains(substring.to_string()),
            output,
        ))
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&self, output: MockProcessOutput) -> &Self {
        self.state.lock().unwrap().default_output = Some(output);
        self
    }

    /// All commands that were run, in order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Display form of every command that was run.
    pub fn call_lines(&self) -> Vec<String> {
        self.calls().iter().map(CommandSpec::display_command).collect()
    }

    /// Verify that all expectations with a specific count were satisfied.
    pub fn verify(&self) -> Result<()> {
        let state = self.state.lock().unwrap();
        for (i, exp) in state.expectations.iter().enumerate() {
            if let Some(expected) = exp.times {
                if exp.used != expected {
                    bail!(
                        "expectation {} was used {} times, expected {}",
                        i,
                        exp.used,
                        expected
                    );
                }
            }
        }
        Ok(())
    }
}

impl ProcessRunner for MockExecutor {
    fn run(&self, spec: &CommandSpec) -> Result<ProcessOutput> {
        let full_cmd = spec.display_command();
        let mut state = self.state.lock().unwrap();
        state.calls.push(spec.clone());

        for exp in &mut state.expectations {
            if exp.pattern.matches(&full_cmd) && exp.available() {
                exp.used += 1;
                return Ok(exp.output.clone().into());
            }
        }

        if let Some(ref default) = state.default_output {
            return Ok(default.clone().into());
        }

        bail!("unexpected command: {}", full_cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_filesystem_basic() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/project/sigbuild.json", "{}");

        assert!(fs.is_dir(Path::new("/project")));
        assert_eq!(fs.read(Path::new("/project/sigbuild.json")).unwrap(), b"{}");
        assert_eq!(
            fs.read(Path::new("/missing")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn test_mock_filesystem_directories() {
        let fs = MockFileSystem::new().fail_create_dir("/locked");

        fs.create_dir_all(Path::new("/a/b/c")).unwrap();
        assert!(fs.is_dir(Path::new("/a")));
        assert!(fs.is_dir(Path::new("/a/b")));
        assert!(fs.is_dir(Path::new("/a/b/c")));
        assert!(fs.create_dir_all(Path::new("/locked")).is_err());

        let fs = fs.with_cwd("/a/b");
        assert_eq!(fs.current_dir().unwrap(), PathBuf::from("/a/b"));
    }

    #[test]
    fn test_mock_executor_basic() {
        let exec = MockExecutor::new();
        exec.expect("gcc --version", MockProcessOutput::success("gcc 12.0.0"));
        exec.expect_prefix("sh -c", MockProcessOutput::failure(2, "boom"));

        let result = exec.run(&CommandSpec::new("gcc").arg("--version")).unwrap();
        assert!(result.success());
        assert_eq!(result.stdout, b"gcc 12.0.0");

        let result = exec.run(&CommandSpec::new("sh").args(["-c", "exit 2"])).unwrap();
        assert_eq!(result.status, Some(2));

        assert_eq!(exec.call_lines(), vec!["gcc --version", "sh -c exit 2"]);
    }

    #[test]
    fn test_mock_executor_unexpected() {
        let exec = MockExecutor::new();
        assert!(exec.run(&CommandSpec::new("unknown")).is_err());
    }

    #[test]
    fn test_mock_executor_times() {
        let exec = MockExecutor::new();
        exec.expect_pattern(
            CommandExpectation::new(
                CommandPattern::Regex(r"^cc -c .*\.c".to_string()),
                MockProcessOutput::success(""),
            )
            .times(1),
        );
        exec.set_default(MockProcessOutput::failure(1, ""));

        assert!(exec.run(&CommandSpec::new("cc").args(["-c", "a.c"])).unwrap().success());
        assert!(!exec.run(&CommandSpec::new("cc").args(["-c", "b.c"])).unwrap().success());
        exec.verify().unwrap();
    }
}

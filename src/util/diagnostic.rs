//! User-friendly diagnostic messages.
//!
//! Errors reported to the user carry the failing manifest or target,
//! context lines, and suggested fixes.

use std::fmt;
use std::path::PathBuf;

use miette::{Diagnostic as MietteDiagnostic, NamedSource, SourceOffset, SourceSpan};
use thiserror::Error;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when no manifest file is found.
    pub const NO_MANIFEST: &str =
        "pass the manifest explicitly: `sigbuild build path/to/sigbuild.json`";

    /// Suggestion when a target is not found.
    pub const TARGET_NOT_FOUND: &str = "run `sigbuild list` to see available targets";

    /// Suggestion when no target was selected.
    pub const NO_TARGET: &str =
        "name a target with `sigbuild build <manifest>:<target>` or set `default_target`";

    /// Suggestion when a variable is not defined.
    pub const UNDEFINED_VARIABLE: &str = "define it in the manifest's `vars` object";

    /// Suggestion when build fails.
    pub const BUILD_FAILED: &str = "run `sigbuild -v build` for more details";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
    Help,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
            Severity::Help => write!(f, "help"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic::new(Severity::Error, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic::new(Severity::Warning, message)
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = match (color, self.severity) {
            (true, Severity::Error) => "\x1b[1;31merror\x1b[0m".to_string(),
            (true, Severity::Warning) => "\x1b[1;33mwarning\x1b[0m".to_string(),
            (true, Severity::Note) => "\x1b[1;36mnote\x1b[0m".to_string(),
            (true, Severity::Help) => "\x1b[1;32mhelp\x1b[0m".to_string(),
            (false, severity) => severity.to_string(),
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            for suggestion in &self.suggestions {
                output.push_str(&format!("{}: {}\n", help_prefix, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// A JSON syntax error pointing into the manifest source.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("invalid JSON in manifest: {message}")]
#[diagnostic(
    code(sigbuild::manifest::invalid_json),
    help("fix the syntax error; the manifest must be a single JSON object")
)]
pub struct InvalidJsonError {
    pub message: String,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("here")]
    pub span: SourceSpan,
}

impl InvalidJsonError {
    /// Build the report from a 1-based line/column as produced by serde_json.
    pub fn new(
        name: impl AsRef<str>,
        source: String,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        let offset = SourceOffset::from_location(&source, line, column.max(1));
        InvalidJsonError {
            message: message.into(),
            span: SourceSpan::new(offset, 0),
            src: NamedSource::new(name, source),
        }
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

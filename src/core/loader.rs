//! Manifest loading.
//!
//! Reads a JSON manifest into a [`Configuration`], resolving `{name}`
//! placeholders as each string is read. Loading is all-or-nothing: if any
//! target fails, every target built so far is dropped and the session's
//! variables are discarded.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::manifest::Configuration;
use crate::core::session::Session;
use crate::core::target::{BuildTarget, CompileSpec, TargetKind};
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::fs::FileSystem;

/// Manifest keys.
pub mod keys {
    pub const NAME: &str = "name";
    pub const DIR: &str = "dir";
    pub const LOG_FILE: &str = "log_file";
    pub const DEFAULT_TARGET: &str = "default_target";
    pub const VARS: &str = "vars";
    pub const TARGETS: &str = "targets";
    pub const TYPE: &str = "type";
    pub const COMMANDS: &str = "commands";
    pub const SOURCES: &str = "sources";
    pub const BUILD_DIR: &str = "build_dir";
    pub const COMPILER: &str = "compiler";
    pub const COMPILER_FLAGS: &str = "compiler_flags";
    pub const LINKER_FLAGS: &str = "linker_flags";
    pub const OUT_DIR: &str = "out_dir";
    pub const OUTPUT: &str = "output";
}

/// Field name reported when a document or target element is not an object.
pub const ROOT_FIELD: &str = "<root>";

/// Errors produced while loading a manifest.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("configuration file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read configuration file: {}", .path.display())]
    FileReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "invalid JSON in {} at line {line}, column {column}: {message}",
        .path.display()
    )]
    InvalidJson {
        path: PathBuf,
        message: String,
        line: usize,
        column: usize,
    },

    #[error("missing required field `{field}`")]
    MissingField { field: String },

    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("failed to load target {}", target_label(.index, .name))]
    TargetLoadFailed {
        index: usize,
        name: Option<String>,
        #[source]
        source: Box<LoaderError>,
    },
}

fn target_label(index: &usize, name: &Option<String>) -> String {
    match name {
        Some(name) => format!("`{}` (index {})", name, index),
        None => format!("at index {}", index),
    }
}

impl LoaderError {
    /// Render for the terminal, with the underlying cause and a suggested fix.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            LoaderError::FileNotFound { .. } => diag.with_suggestion(suggestions::NO_MANIFEST),
            LoaderError::FileReadError { source, .. } => diag.with_context(source.to_string()),
            LoaderError::TargetLoadFailed { source, .. } => diag.with_context(source.to_string()),
            _ => diag,
        }
    }

    /// The innermost error, looking through [`LoaderError::TargetLoadFailed`].
    pub fn root_cause(&self) -> &LoaderError {
        match self {
            LoaderError::TargetLoadFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

fn missing(field: impl Into<String>) -> LoaderError {
    LoaderError::MissingField {
        field: field.into(),
    }
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> LoaderError {
    LoaderError::InvalidField {
        field: field.into(),
        reason: reason.into(),
    }
}

/// A syntax error reported by a [`ManifestFormat`], positions 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

/// Capability that turns manifest text into a JSON value tree.
pub trait ManifestFormat {
    fn parse(&self, text: &str) -> Result<Value, SyntaxError>;
}

/// [`ManifestFormat`] backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl ManifestFormat for JsonFormat {
    fn parse(&self, text: &str) -> Result<Value, SyntaxError> {
        serde_json::from_str(text).map_err(|e| {
            // serde_json appends the position; it is reported separately.
            let full = e.to_string();
            let message = full.split(" at line ").next().unwrap_or(&full).to_string();
            SyntaxError {
                message,
                line: e.line(),
                column: e.column(),
            }
        })
    }
}

/// Loads manifests through injected file and format capabilities.
pub struct ConfigurationLoader<'a> {
    fs: &'a dyn FileSystem,
    format: &'a dyn ManifestFormat,
}

impl<'a> ConfigurationLoader<'a> {
    pub fn new(fs: &'a dyn FileSystem, format: &'a dyn ManifestFormat) -> Self {
        ConfigurationLoader { fs, format }
    }

    /// Load the manifest at `path`.
    ///
    /// The session's variable table is rebuilt from `vars` and unresolved
    /// placeholders are recorded as warnings in the session. On failure the
    /// variable table is left empty.
    pub fn load(&self, session: &mut Session, path: &Path) -> Result<Configuration, LoaderError> {
        tracing::info!("Loading {}", path.display());

        let result = self.load_document(session, path);
        if let Err(ref e) = result {
            tracing::debug!("discarding variables after failed load: {}", e);
            session.variables_mut().dispose();
        }
        result
    }

    fn read(&self, path: &Path) -> Result<String, LoaderError> {
        let bytes = self.fs.read(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => LoaderError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => LoaderError::FileReadError {
                path: path.to_path_buf(),
                source,
            },
        })?;

        String::from_utf8(bytes).map_err(|e| LoaderError::FileReadError {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })
    }

    fn load_document(
        &self,
        session: &mut Session,
        path: &Path,
    ) -> Result<Configuration, LoaderError> {
        let text = self.read(path)?;
        let document = self
            .format
            .parse(&text)
            .map_err(|e| LoaderError::InvalidJson {
                path: path.to_path_buf(),
                message: e.message,
                line: e.line,
                column: e.column,
            })?;
        let root = document
            .as_object()
            .ok_or_else(|| invalid(ROOT_FIELD, "expected a JSON object"))?;

        let name = optional_str(root, keys::NAME)?.map(String::from);
        let default_target = optional_str(root, keys::DEFAULT_TARGET)?.map(String::from);
        let raw_dir = optional_str(root, keys::DIR)?;
        let raw_log_file = optional_str(root, keys::LOG_FILE)?;

        // Variables must be in place before any other field is resolved.
        session.clear_diagnostics();
        let definitions = read_vars(root)?;
        session.variables_mut().load(definitions);

        let mut subst = Substituter::new(session, None);
        let working_directory = match raw_dir {
            Some(dir) => PathBuf::from(subst.string(keys::DIR, dir)),
            None => self
                .fs
                .current_dir()
                .map_err(|source| LoaderError::FileReadError {
                    path: PathBuf::from("."),
                    source,
                })?,
        };
        let log_file = raw_log_file.map(|raw| PathBuf::from(subst.string(keys::LOG_FILE, raw)));

        let variables = session
            .variables()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let targets = match root.get(keys::TARGETS) {
            None | Some(Value::Null) => {
                tracing::warn!("{} defines no `targets`", path.display());
                Vec::new()
            }
            Some(Value::Array(elements)) => load_targets(session, elements, &working_directory)?,
            Some(_) => return Err(invalid(keys::TARGETS, "expected an array of targets")),
        };

        tracing::debug!(
            "loaded {} target(s) from {}",
            targets.len(),
            path.display()
        );

        Ok(Configuration {
            name,
            working_directory,
            log_file,
            default_target,
            variables,
            targets,
        })
    }
}

/// Resolves placeholders and records the ones left unresolved.
struct Substituter<'a> {
    session: &'a mut Session,
    target: Option<&'a str>,
}

impl<'a> Substituter<'a> {
    fn new(session: &'a mut Session, target: Option<&'a str>) -> Self {
        Substituter { session, target }
    }

    fn field(&self, key: &str) -> String {
        match self.target {
            Some(target) => format!("{}.{}.{}", keys::TARGETS, target, key),
            None => key.to_string(),
        }
    }

    fn string(&mut self, key: &str, raw: &str) -> String {
        let resolved = self.session.variables().resolve(raw);
        if !resolved.is_complete() {
            let field = self.field(key);
            for name in &resolved.unresolved {
                tracing::warn!("unresolved variable `{{{}}}` in `{}`", name, field);
                self.session.push_diagnostic(
                    Diagnostic::warning(format!("unresolved variable `{{{}}}`", name))
                        .with_context(format!("in field `{}`", field))
                        .with_suggestion(suggestions::UNDEFINED_VARIABLE),
                );
            }
        }
        resolved.value
    }

    fn strings(&mut self, key: &str, raw: &[&str]) -> Vec<String> {
        raw.iter().map(|item| self.string(key, item)).collect()
    }
}

fn read_vars(root: &Map<String, Value>) -> Result<Vec<(String, String)>, LoaderError> {
    match root.get(keys::VARS) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Object(vars)) => vars
            .iter()
            .map(|(key, value)| {
                value
                    .as_str()
                    .map(|v| (key.clone(), v.to_string()))
                    .ok_or_else(|| {
                        invalid(
                            format!("{}.{}", keys::VARS, key),
                            "variable values must be strings",
                        )
                    })
            })
            .collect(),
        Some(_) => Err(invalid(keys::VARS, "expected an object of string values")),
    }
}

fn load_targets(
    session: &mut Session,
    elements: &[Value],
    base_dir: &Path,
) -> Result<Vec<BuildTarget>, LoaderError> {
    let mut targets: Vec<BuildTarget> = Vec::with_capacity(elements.len());

    for (index, element) in elements.iter().enumerate() {
        let loaded = load_target(session, element, base_dir).and_then(|target| {
            if targets.iter().any(|t| t.name == target.name) {
                Err(invalid(
                    keys::NAME,
                    format!("duplicate target name `{}`", target.name),
                ))
            } else {
                Ok(target)
            }
        });

        // Returning here drops every target loaded so far.
        let target = loaded.map_err(|source| LoaderError::TargetLoadFailed {
            index,
            name: element
                .get(keys::NAME)
                .and_then(Value::as_str)
                .map(String::from),
            source: Box::new(source),
        })?;

        tracing::debug!("loaded target `{}` ({})", target.name, target.kind);
        targets.push(target);
    }

    Ok(targets)
}

fn load_target(
    session: &mut Session,
    element: &Value,
    base_dir: &Path,
) -> Result<BuildTarget, LoaderError> {
    let object = element
        .as_object()
        .ok_or_else(|| invalid(ROOT_FIELD, "expected a JSON object"))?;

    let name = required_str(object, keys::NAME)?;
    let kind: TargetKind = required_str(object, keys::TYPE)?
        .parse()
        .map_err(|reason: String| invalid(keys::TYPE, reason))?;
    let raw_dir = optional_str(object, keys::DIR)?;

    let platform = session.platform().to_string();
    let mut subst = Substituter::new(session, Some(name));

    let working_directory = match raw_dir {
        Some(dir) => PathBuf::from(subst.string(keys::DIR, dir)),
        None => base_dir.to_path_buf(),
    };

    if kind == TargetKind::Operation {
        let commands = load_commands(&mut subst, object, &platform)?;
        return Ok(BuildTarget::operation(name, working_directory, commands));
    }

    let spec = load_compile_spec(&mut subst, object, name)?;
    Ok(BuildTarget::compiled(name, kind, working_directory, spec))
}

fn load_commands(
    subst: &mut Substituter<'_>,
    object: &Map<String, Value>,
    platform: &str,
) -> Result<Vec<String>, LoaderError> {
    let field = format!("{}.{}", keys::COMMANDS, platform);

    let for_platform = match object.get(keys::COMMANDS) {
        None | Some(Value::Null) => None,
        Some(Value::Object(by_platform)) => by_platform.get(platform).filter(|v| !v.is_null()),
        Some(_) => {
            return Err(invalid(
                keys::COMMANDS,
                "expected an object keyed by platform",
            ))
        }
    };

    let value = for_platform.ok_or_else(|| missing(field.as_str()))?;
    let raw = string_array(value, &field)?;
    Ok(subst.strings(&field, &raw))
}

fn load_compile_spec(
    subst: &mut Substituter<'_>,
    object: &Map<String, Value>,
    name: &str,
) -> Result<CompileSpec, LoaderError> {
    let sources = object
        .get(keys::SOURCES)
        .filter(|v| !v.is_null())
        .ok_or_else(|| missing(keys::SOURCES))?;
    let sources = string_array(sources, keys::SOURCES)?;
    if sources.is_empty() {
        return Err(invalid(keys::SOURCES, "must list at least one source file"));
    }

    let build_dir = required_str(object, keys::BUILD_DIR)?;
    let compiler = required_str(object, keys::COMPILER)?;
    let compiler_flags = optional_array(object, keys::COMPILER_FLAGS)?;
    let linker_flags = optional_array(object, keys::LINKER_FLAGS)?;
    let out_dir = optional_str(object, keys::OUT_DIR)?;
    let output = optional_str(object, keys::OUTPUT)?;

    let build_directory = PathBuf::from(subst.string(keys::BUILD_DIR, build_dir));
    let output_directory = match out_dir {
        Some(dir) => PathBuf::from(subst.string(keys::OUT_DIR, dir)),
        None => build_directory.clone(),
    };
    let output_name = match output {
        Some(output) => subst.string(keys::OUTPUT, output),
        None => name.to_string(),
    };

    Ok(CompileSpec {
        sources: subst.strings(keys::SOURCES, &sources),
        compiler: subst.string(keys::COMPILER, compiler),
        compiler_flags: subst.strings(keys::COMPILER_FLAGS, &compiler_flags),
        linker_flags: subst.strings(keys::LINKER_FLAGS, &linker_flags),
        build_directory,
        output_directory,
        output_name,
    })
}

fn optional_str<'v>(
    object: &'v Map<String, Value>,
    key: &str,
) -> Result<Option<&'v str>, LoaderError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(invalid(key, "expected a string")),
    }
}

fn required_str<'v>(object: &'v Map<String, Value>, key: &str) -> Result<&'v str, LoaderError> {
    optional_str(object, key)?.ok_or_else(|| missing(key))
}

fn optional_array<'v>(
    object: &'v Map<String, Value>,
    key: &str,
) -> Result<Vec<&'v str>, LoaderError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => string_array(value, key),
    }
}

fn string_array<'v>(value: &'v Value, field: &str) -> Result<Vec<&'v str>, LoaderError> {
    let items = value
        .as_array()
        .ok_or_else(|| invalid(field, "expected an array of strings"))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .ok_or_else(|| invalid(format!("{}[{}]", field, i), "expected a string"))
        })
        .collect()
}

//! Per-run state shared by the loader and the front end.

use crate::core::manifest::Configuration;
use crate::core::variables::VariableTable;
use crate::util::diagnostic::Diagnostic;

/// Owns the variable table, the live configuration and the warnings
/// collected while loading it.
///
/// Several sessions can coexist in one process; nothing here is global.
#[derive(Debug)]
pub struct Session {
    variables: VariableTable,
    diagnostics: Vec<Diagnostic>,
    platform: String,
    configuration: Option<Configuration>,
}

impl Session {
    /// Create a session for the host platform.
    pub fn new() -> Self {
        Session::with_platform(std::env::consts::OS)
    }

    /// Create a session that selects `commands.<platform>` for op targets.
    pub fn with_platform(platform: impl Into<String>) -> Self {
        Session {
            variables: VariableTable::new(),
            diagnostics: Vec::new(),
            platform: platform.into(),
            configuration: None,
        }
    }

    /// Platform key used for op target commands.
    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn variables(&self) -> &VariableTable {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut VariableTable {
        &mut self.variables
    }

    /// Warnings recorded during the last load.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn clear_diagnostics(&mut self) {
        self.diagnostics.clear();
    }

    /// Make `configuration` the live one, dropping any previous one.
    pub fn install(&mut self, configuration: Configuration) -> &Configuration {
        self.configuration.insert(configuration)
    }

    /// The live configuration, if any.
    pub fn configuration(&self) -> Option<&Configuration> {
        self.configuration.as_ref()
    }

    /// Release the live configuration and reset all session state.
    ///
    /// Calling this more than once is harmless.
    pub fn dispose(&mut self) {
        if let Some(configuration) = self.configuration.take() {
            tracing::debug!(
                "disposing configuration with {} target(s)",
                configuration.targets.len()
            );
        }
        self.variables.dispose();
        self.diagnostics.clear();
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

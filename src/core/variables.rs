//! Variable table and `{name}` placeholder substitution.

use std::collections::BTreeMap;

/// Flat mapping from variable name to value, built from a manifest's `vars`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableTable {
    entries: BTreeMap<String, String>,
}

/// Result of substituting placeholders in one string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// The string with every known placeholder replaced
    pub value: String,
    /// Placeholder names that had no definition, in order of appearance
    pub unresolved: Vec<String>,
}

impl Resolved {
    /// Check if every placeholder was resolved.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

impl VariableTable {
    /// Create an empty table.
    pub fn new() -> Self {
        VariableTable::default()
    }

    /// Replace the table contents with the given definitions.
    ///
    /// Later definitions of the same key win.
    pub fn load<I, K, V>(&mut self, definitions: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.dispose();
        self.entries.extend(
            definitions
                .into_iter()
                .map(|(k, v)| (k.into(), v.into())),
        );
        tracing::debug!("loaded {} variable(s)", self.entries.len());
    }

    /// Look up a variable.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        let value = self.entries.get(key).map(String::as_str);
        if value.is_none() {
            tracing::debug!("unknown variable: {}", key);
        }
        value
    }

    /// Remove every entry. Safe to call repeatedly or on an empty table.
    pub fn dispose(&mut self) {
        self.entries.clear();
    }

    /// Number of defined variables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no variables are defined.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over definitions, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Substitute every `{name}` placeholder in `input`.
    ///
    /// Scanning is left to right. A `{` without a later `}` ends the scan
    /// and the remainder is kept as-is. Substituted values are not scanned
    /// again. Unknown names are left in place, braces included, and
    /// reported in [`Resolved::unresolved`].
    pub fn resolve(&self, input: &str) -> Resolved {
        let mut value = String::with_capacity(input.len());
        let mut unresolved = Vec::new();
        let mut rest = input;

        while let Some(open) = rest.find('{') {
            let Some(len) = rest[open..].find('}') else {
                break;
            };
            let close = open + len;
            let key = &rest[open + 1..close];

            match self.lookup(key) {
                Some(replacement) => {
                    value.push_str(&rest[..open]);
                    value.push_str(replacement);
                }
                None => {
                    value.push_str(&rest[..=close]);
                    unresolved.push(key.to_string());
                }
            }

            rest = &rest[close + 1..];
        }

        value.push_str(rest);
        Resolved { value, unresolved }
    }
}

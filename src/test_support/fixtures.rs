//! Test fixtures for common test scenarios.
//!
//! Manifests are built with `serde_json::json!` so tests can tweak single
//! fields before serializing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

use crate::util::config::DEFAULT_MANIFEST;

/// Serialize a manifest with the given `vars` object and target list.
pub fn manifest(vars: Value, targets: Vec<Value>) -> String {
    json!({ "vars": vars, "targets": targets }).to_string()
}

/// An `exe` target with the required fields only.
pub fn exe_target(name: &str, sources: &[&str], build_dir: &str, compiler: &str) -> Value {
    json!({
        "name": name,
        "type": "exe",
        "sources": sources,
        "build_dir": build_dir,
        "compiler": compiler,
    })
}

/// An `op` target with commands per platform key.
pub fn op_target(name: &str, commands: &[(&str, &[&str])]) -> Value {
    let by_platform: Map<String, Value> = commands
        .iter()
        .map(|(platform, cmds)| (platform.to_string(), json!(cmds)))
        .collect();

    json!({
        "name": name,
        "type": "op",
        "commands": by_platform,
    })
}

/// Fixture for a project directory: a manifest plus source files.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    /// Manifest document.
    pub manifest: Value,
    /// Source files (path relative to project root -> content).
    pub sources: BTreeMap<PathBuf, String>,
}

impl ProjectFixture {
    /// Create a project with the given manifest document.
    pub fn new(manifest: Value) -> Self {
        ProjectFixture {
            manifest,
            sources: BTreeMap::new(),
        }
    }

    /// A single-executable C project compiled with `compiler`.
    pub fn executable(name: &str, compiler: &str) -> Self {
        ProjectFixture::new(json!({
            "name": name,
            "vars": { "OUT": "build" },
            "default_target": name,
            "targets": [{
                "name": name,
                "type": "exe",
                "sources": ["src/main.c"],
                "build_dir": "{OUT}/obj",
                "out_dir": "{OUT}/bin",
                "compiler": compiler,
            }]
        }))
        .with_source("src/main.c", sources::main_c())
    }

    /// Add a source file.
    pub fn with_source(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.sources.insert(path.into(), content.into());
        self
    }

    /// Write this fixture to a real directory, returning the manifest path.
    pub fn write_to(&self, project_path: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(project_path)?;

        let manifest_path = project_path.join(DEFAULT_MANIFEST);
        std::fs::write(&manifest_path, self.manifest.to_string())?;

        for (rel_path, content) in &self.sources {
            let full_path = project_path.join(rel_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, content)?;
        }

        Ok(manifest_path)
    }

    /// Write this fixture to a MockFileSystem, returning the manifest path.
    pub fn write_to_mock(&self, fs: &mut super::MockFileSystem, project_path: &Path) -> PathBuf {
        fs.add_dir(project_path);

        let manifest_path = project_path.join(DEFAULT_MANIFEST);
        fs.add_file(&manifest_path, self.manifest.to_string());

        for (rel_path, content) in &self.sources {
            fs.add_file(project_path.join(rel_path), content.as_bytes());
        }

        manifest_path
    }
}

/// C source templates.
pub mod sources {
    /// A minimal main.c for executables.
    pub fn main_c() -> &'static str {
        r#"#include <stdio.h>

int main(void) {
    printf("Hello from test!\n");
    return 0;
}
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_target_shape() {
        let target = op_target("gen", &[("linux", &["echo a", "echo b"])]);
        assert_eq!(target["type"], "op");
        assert_eq!(target["commands"]["linux"][1], "echo b");
    }

    #[test]
    fn test_fixture_write_to() {
        let tmp = tempfile::TempDir::new().unwrap();
        let manifest = ProjectFixture::executable("app", "cc")
            .write_to(tmp.path())
            .unwrap();

        assert_eq!(manifest, tmp.path().join("sigbuild.json"));
        assert!(tmp.path().join("src/main.c").exists());
        let text = std::fs::read_to_string(manifest).unwrap();
        assert!(text.contains("\"default_target\":\"app\""));
    }
}

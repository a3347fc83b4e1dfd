//! Project folder fixtures.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

/// Fixture for a complete project folder.
#[derive(Debug, Clone, Default)]
pub struct ProjectFixture {
    /// Directory name of the project.
    pub dir_name: String,
    /// `name` in project.json.
    pub name: Option<String>,
    /// `projectVersion` in project.json.
    pub version: Option<String>,
    /// `description` in project.json.
    pub description: Option<String>,
    /// `projectType` in project.json.
    pub project_type: Option<String>,
    /// `main` in project.json.
    pub main: Option<String>,
    /// Workflow files (path relative to project root -> content).
    pub workflows: Vec<(PathBuf, String)>,
}

impl ProjectFixture {
    /// A process project with `Main.xaml` as entry point.
    pub fn process(name: impl Into<String>) -> Self {
        let name = name.into();
        ProjectFixture {
            dir_name: name.clone(),
            name: Some(name),
            version: Some("1.0.0".to_string()),
            description: Some("Fixture process".to_string()),
            project_type: None,
            main: Some("Main.xaml".to_string()),
            workflows: Vec::new(),
        }
    }

    /// A library project (no entry point).
    pub fn library(name: impl Into<String>) -> Self {
        ProjectFixture {
            project_type: Some("Library".to_string()),
            main: None,
            description: Some("Fixture library".to_string()),
            ..Self::process(name)
        }
    }

    /// Set or clear the `name` field.
    pub fn with_name(mut self, name: Option<&str>) -> Self {
        self.name = name.map(str::to_string);
        self
    }

    /// Set or clear the `projectVersion` field.
    pub fn with_version(mut self, version: Option<&str>) -> Self {
        self.version = version.map(str::to_string);
        self
    }

    /// Set or clear the `description` field.
    pub fn with_description(mut self, description: Option<&str>) -> Self {
        self.description = description.map(str::to_string);
        self
    }

    /// Set or clear the `main` field.
    pub fn with_main(mut self, main: Option<&str>) -> Self {
        self.main = main.map(str::to_string);
        self
    }

    /// Add a workflow file.
    pub fn with_workflow(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.workflows.push((path.into(), content.into()));
        self
    }

    /// Render project.json.
    pub fn manifest(&self) -> String {
        let mut object = Map::new();
        let fields = [
            ("name", &self.name),
            ("projectVersion", &self.version),
            ("description", &self.description),
            ("projectType", &self.project_type),
            ("main", &self.main),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                object.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        object.insert(
            "schemaVersion".to_string(),
            Value::String("4.0".to_string()),
        );

        Value::Object(object).to_string()
    }

    /// Write the fixture to disk, returning the project directory.
    pub fn write_to(&self, base_path: &Path) -> std::io::Result<PathBuf> {
        let project_path = base_path.join(&self.dir_name);
        std::fs::create_dir_all(&project_path)?;

        std::fs::write(project_path.join("project.json"), self.manifest())?;

        for (rel_path, content) in &self.workflows {
            let full_path = project_path.join(rel_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, content)?;
        }

        Ok(project_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_omits_missing_fields() {
        let manifest: Value =
            serde_json::from_str(&ProjectFixture::library("Lib").with_name(None).manifest())
                .unwrap();

        assert!(manifest.get("name").is_none());
        assert!(manifest.get("main").is_none());
        assert_eq!(manifest["projectType"], "Library");
    }
}

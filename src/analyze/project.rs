//! Projects: a `project.json` manifest plus the workflow files around it.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::{DirEntry, WalkDir};

use crate::analyze::error::AnalyzeError;
use crate::analyze::workflow::Workflow;
use crate::util::config::TEST_ASSET_DIR;
use crate::util::fs::{relative_path, to_slash};
use crate::xaml::XamlNamespaces;

/// Manifest file name.
pub const MANIFEST_NAME: &str = "project.json";

/// Extension of workflow files.
pub const WORKFLOW_EXTENSION: &str = "xaml";

/// Placeholder when the manifest has no `name` (templates such as REFramework).
pub const MISSING_NAME: &str = "MISSING NAME";

/// Placeholder when the manifest has no `projectVersion`.
pub const MISSING_VERSION: &str = "MISSING VERSION";

/// Kind of project, from `projectType`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProjectType {
    /// A process with a main entry point (the default)
    #[default]
    Workflow,
    /// A library of reusable workflows, without entry point
    Library,
    /// Any other declared type, kept verbatim
    Other(String),
}

impl ProjectType {
    /// Parse the manifest value.
    pub fn from_manifest(value: &str) -> Self {
        match value {
            "Workflow" => ProjectType::Workflow,
            "Library" => ProjectType::Library,
            other => ProjectType::Other(other.to_string()),
        }
    }

    /// Get the manifest spelling.
    pub fn as_str(&self) -> &str {
        match self {
            ProjectType::Workflow => "Workflow",
            ProjectType::Library => "Library",
            ProjectType::Other(s) => s,
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// project.json as deserialized. Every key is optional at this level;
/// requirements are checked afterwards so errors can name the field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawManifest {
    name: Option<String>,
    project_version: Option<String>,
    description: Option<String>,
    project_type: Option<String>,
    main: Option<String>,
}

/// Validated project metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectProperties {
    /// Project name, or [`MISSING_NAME`]
    pub name: String,

    /// Project version, or [`MISSING_VERSION`]
    pub version: String,

    /// Project description (required)
    pub description: String,

    /// Project type
    pub project_type: ProjectType,

    /// Entry point relative to the project directory; only for `Workflow` projects
    pub main: Option<String>,
}

impl ProjectProperties {
    /// Read `<dir>/project.json`.
    pub fn load(dir: &Path) -> Result<Self, AnalyzeError> {
        let path = dir.join(MANIFEST_NAME);
        if !path.is_file() {
            return Err(AnalyzeError::ProjectNotFound {
                dir: dir.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|source| AnalyzeError::Read {
            path: path.clone(),
            source,
        })?;

        Self::parse(&content, &path)
    }

    /// Parse manifest content. `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, AnalyzeError> {
        let raw: RawManifest =
            serde_json::from_str(content).map_err(|source| AnalyzeError::ManifestParse {
                path: path.to_path_buf(),
                source,
            })?;

        let description = raw.description.ok_or_else(|| AnalyzeError::MissingManifestField {
            path: path.to_path_buf(),
            field: "description",
        })?;

        let project_type = raw
            .project_type
            .as_deref()
            .map(ProjectType::from_manifest)
            .unwrap_or_default();

        // Libraries have no entry point
        let main = if project_type == ProjectType::Workflow {
            let main = raw.main.ok_or_else(|| AnalyzeError::MissingManifestField {
                path: path.to_path_buf(),
                field: "main",
            })?;
            Some(main)
        } else {
            None
        };

        Ok(ProjectProperties {
            name: raw.name.unwrap_or_else(|| MISSING_NAME.to_string()),
            version: raw
                .project_version
                .unwrap_or_else(|| MISSING_VERSION.to_string()),
            description,
            project_type,
            main,
        })
    }
}

/// Options for opening a project.
#[derive(Debug, Clone)]
pub struct ProjectOptions {
    /// Namespace table used for every workflow
    pub namespaces: XamlNamespaces,

    /// Directory suffixes excluded from discovery
    pub excluded_dirs: Vec<String>,

    /// Return the first workflow error instead of skipping the workflow
    pub fail_fast: bool,
}

impl Default for ProjectOptions {
    fn default() -> Self {
        ProjectOptions {
            namespaces: XamlNamespaces::UIPATH,
            excluded_dirs: vec![TEST_ASSET_DIR.to_string()],
            fail_fast: false,
        }
    }
}

/// A workflow file that could not be analyzed.
#[derive(Debug)]
pub struct WorkflowFailure {
    /// The workflow file
    pub path: PathBuf,

    /// Why it was skipped
    pub error: AnalyzeError,
}

/// A project being analyzed.
///
/// Workflows are parsed once when the project is opened and kept in
/// discovery order, so any number of passes can iterate them.
#[derive(Debug)]
pub struct Project {
    directory: PathBuf,
    properties: ProjectProperties,
    namespaces: XamlNamespaces,
    workflows: Vec<Workflow>,
    failures: Vec<WorkflowFailure>,
}

impl Project {
    /// Open the project in `directory`: read the manifest, discover and
    /// parse its workflows.
    pub fn open(directory: &Path, options: &ProjectOptions) -> Result<Self, AnalyzeError> {
        let properties = ProjectProperties::load(directory)?;
        tracing::info!(
            "analyzing {} {} ({})",
            properties.name,
            properties.version,
            properties.project_type
        );

        let files = discover_workflow_files(directory, &options.excluded_dirs);
        tracing::debug!("discovered {} workflow files", files.len());

        let mut workflows = Vec::with_capacity(files.len());
        let mut failures = Vec::new();

        for (path, result) in files
            .iter()
            .zip(parse_workflows(files.iter().cloned(), &options.namespaces))
        {
            match result {
                Ok(workflow) => workflows.push(workflow),
                Err(error) if options.fail_fast => return Err(error),
                Err(error) => {
                    tracing::warn!("skipping {}: {}", path.display(), error);
                    failures.push(WorkflowFailure {
                        path: path.clone(),
                        error,
                    });
                }
            }
        }

        Ok(Project {
            directory: directory.to_path_buf(),
            properties,
            namespaces: options.namespaces,
            workflows,
            failures,
        })
    }

    /// Root directory; every relative path is computed against it.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Manifest metadata.
    pub fn properties(&self) -> &ProjectProperties {
        &self.properties
    }

    /// Project name.
    pub fn name(&self) -> &str {
        &self.properties.name
    }

    /// Project version.
    pub fn version(&self) -> &str {
        &self.properties.version
    }

    /// Project description.
    pub fn description(&self) -> &str {
        &self.properties.description
    }

    /// Project type.
    pub fn project_type(&self) -> &ProjectType {
        &self.properties.project_type
    }

    /// Entry point relative to the project directory.
    pub fn main(&self) -> Option<&str> {
        self.properties.main.as_deref()
    }

    /// Namespace table the workflows were parsed with.
    pub fn namespaces(&self) -> &XamlNamespaces {
        &self.namespaces
    }

    /// Successfully parsed workflows, in discovery order.
    pub fn workflows(&self) -> &[Workflow] {
        &self.workflows
    }

    /// Workflows that were skipped.
    pub fn failures(&self) -> &[WorkflowFailure] {
        &self.failures
    }

    /// Path of a file relative to the project directory, `/`-separated.
    pub fn relative_path(&self, path: &Path) -> String {
        to_slash(&relative_path(&self.directory, path))
    }
}

/// Parse each path as a workflow, one file at a time, as the iterator is
/// advanced. The sequence is single-pass: collect it for repeated use.
pub fn parse_workflows<'a>(
    paths: impl IntoIterator<Item = PathBuf> + 'a,
    namespaces: &'a XamlNamespaces,
) -> impl Iterator<Item = Result<Workflow, AnalyzeError>> + 'a {
    paths
        .into_iter()
        .map(move |path| Workflow::load(&path, namespaces))
}

/// List every `.xaml` file below `directory`.
///
/// Hidden directories and files are skipped, as are files whose containing
/// directory ends with one of `excluded_dirs`. Entries are visited sorted by
/// file name at each level, so the order is stable between runs.
pub fn discover_workflow_files(directory: &Path, excluded_dirs: &[String]) -> Vec<PathBuf> {
    WalkDir::new(directory)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("failed to read directory entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(DirEntry::into_path)
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext == WORKFLOW_EXTENSION)
        })
        .filter(|path| !is_excluded(path, excluded_dirs))
        .collect()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn is_excluded(path: &Path, excluded_dirs: &[String]) -> bool {
    path.parent()
        .is_some_and(|dir| excluded_dirs.iter().any(|suffix| dir.ends_with(suffix)))
}

//! Analysis error types and diagnostics.

use std::path::PathBuf;

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::xaml::XamlError;

/// Error while reading a project or one of its workflows.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("no project.json found in {} - not a valid project folder", dir.display())]
    ProjectNotFound { dir: PathBuf },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} is missing required field `{field}`", path.display())]
    MissingManifestField { path: PathBuf, field: &'static str },

    #[error("malformed XML in {}", path.display())]
    XmlParse {
        path: PathBuf,
        #[source]
        source: XamlError,
    },

    #[error("argument `{name}` has no Type attribute")]
    MissingArgumentType { name: String },

    #[error("argument `{name}` has unknown direction in type `{raw_type}`")]
    UnknownArgumentDirection { name: String, raw_type: String },

    #[error("argument `{name}` has malformed type `{raw_type}`")]
    MalformedArgumentType { name: String, raw_type: String },

    #[error("invalid argument declaration in {} (line {line})", path.display())]
    InvalidArgument {
        path: PathBuf,
        line: u32,
        #[source]
        source: Box<AnalyzeError>,
    },
}

impl AnalyzeError {
    /// The file the error is about, when there is one.
    pub fn location(&self) -> Option<&PathBuf> {
        match self {
            AnalyzeError::ProjectNotFound { dir } => Some(dir),
            AnalyzeError::Read { path, .. }
            | AnalyzeError::ManifestParse { path, .. }
            | AnalyzeError::MissingManifestField { path, .. }
            | AnalyzeError::XmlParse { path, .. }
            | AnalyzeError::InvalidArgument { path, .. } => Some(path),
            AnalyzeError::MissingArgumentType { .. }
            | AnalyzeError::UnknownArgumentDirection { .. }
            | AnalyzeError::MalformedArgumentType { .. } => None,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.to_string());
        if let Some(path) = self.location() {
            diag = diag.with_location(path);
        }

        match self {
            AnalyzeError::ProjectNotFound { .. } => diag.with_suggestion(suggestions::NO_PROJECT),

            AnalyzeError::ManifestParse { source, .. } => diag.with_context(source.to_string()),

            AnalyzeError::MissingManifestField { field, .. } => {
                diag.with_suggestion(format!("Add a `{}` entry to project.json", field))
            }

            AnalyzeError::XmlParse { source, .. } => diag
                .with_context(source.to_string())
                .with_suggestion(suggestions::BROKEN_WORKFLOW),

            AnalyzeError::InvalidArgument { source, .. } => diag
                .with_context(source.to_string())
                .with_suggestion(suggestions::BROKEN_WORKFLOW),

            AnalyzeError::Read { source, .. } => diag.with_context(source.to_string()),

            AnalyzeError::MissingArgumentType { .. }
            | AnalyzeError::UnknownArgumentDirection { .. }
            | AnalyzeError::MalformedArgumentType { .. } => diag,
        }
    }
}

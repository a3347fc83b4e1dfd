//! Implementation of the documentation run.

use std::path::PathBuf;

use anyhow::Result;

use crate::analyze::{Project, ProjectOptions};
use crate::render::Documentation;
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::GlobalContext;
use crate::xaml::XamlNamespaces;

/// Options for one documentation run.
#[derive(Debug, Clone)]
pub struct DocumentOptions {
    /// Namespace table used to read the workflows
    pub namespaces: XamlNamespaces,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        DocumentOptions {
            namespaces: XamlNamespaces::UIPATH,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct DocumentResult {
    /// Where the report was written
    pub output_path: PathBuf,

    /// Number of workflows in the report
    pub documented: usize,

    /// One warning per workflow left out of the report
    pub failures: Vec<Diagnostic>,
}

/// Analyze the project in `ctx` and write its HTML report.
///
/// Fatal errors are returned as [`crate::analyze::AnalyzeError`] inside the
/// `anyhow` error and leave no report behind.
pub fn document(ctx: &GlobalContext, opts: &DocumentOptions) -> Result<DocumentResult> {
    let config = ctx.config();
    let project_options = ProjectOptions {
        namespaces: opts.namespaces,
        excluded_dirs: config.discovery.exclude.clone(),
        fail_fast: config.analysis.fail_fast,
    };

    let project = Project::open(ctx.project_dir(), &project_options)?;
    let docs = Documentation::new(&project);

    if let Some(main) = project.main() {
        if docs.main_workflow().is_none() {
            tracing::warn!("main workflow {} not found in project", main);
        }
    }

    let output_path = ctx.output_path();
    docs.write(&output_path)?;

    let failures = project
        .failures()
        .iter()
        .map(|failure| {
            failure
                .error
                .to_diagnostic()
                .as_warning()
                .with_suggestion(suggestions::FAIL_FAST)
        })
        .collect();

    Ok(DocumentResult {
        output_path,
        documented: project.workflows().len(),
        failures,
    })
}

//! Project and workflow analysis.
//!
//! This module turns a project folder into a structured model:
//! - [`Project`]: manifest metadata plus the discovered workflows
//! - [`Workflow`]: one parsed `.xaml` file
//! - [`WorkflowArgument`] and [`Variable`]: declarations inside a workflow

pub mod argument;
pub mod error;
pub mod project;
pub mod variable;
pub mod workflow;

pub use argument::{ArgumentDirection, WorkflowArgument};
pub use error::AnalyzeError;
pub use project::{
    discover_workflow_files, parse_workflows, Project, ProjectOptions, ProjectProperties,
    ProjectType, WorkflowFailure, MANIFEST_NAME, MISSING_NAME, MISSING_VERSION,
};
pub use variable::Variable;
pub use workflow::{SelectorOwner, Workflow};

//! Analyzer - static documentation for UiPath workflow projects
//!
//! This crate reads a project folder (its `project.json` manifest and every
//! `.xaml` workflow below it) into a structured model and renders that model
//! as a single HTML report.

pub mod analyze;
pub mod ops;
pub mod render;
pub mod util;
pub mod xaml;

/// Test fixtures for analyzer unit tests.
///
/// This module is only available when running tests. It provides a project
/// builder that writes manifests and workflows to a temporary directory,
/// plus canned workflow documents.
#[cfg(test)]
pub mod test_support;

pub use analyze::{AnalyzeError, Project, Workflow};
pub use render::Documentation;
pub use util::{Config, GlobalContext};
pub use xaml::XamlNamespaces;

//! HTML documentation for a project.
//!
//! The report lists the main workflow first, then every other workflow in
//! discovery order, each with its arguments, variables and invocations. A
//! table of contents links to the sections through ids derived from the
//! workflow's path inside the project.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;

use crate::analyze::{Project, Workflow};
use crate::render::html::{
    self, ArgumentRow, FailureRow, Invocation, PageBody, PageHeader, TocEntry, VariableRow,
    WorkflowSection,
};
use crate::util::fs::{ensure_dir, normalize_path, to_slash, write_string};
use crate::xaml::strip_namespace_prefix;

/// Encode a `/`-separated project-relative path as an anchor id.
///
/// `-` becomes `--` first, so the `-` that then replaces `/` cannot be
/// confused with one from the file name; `.` becomes `_`.
pub fn workflow_id(relative_path: &str) -> String {
    relative_path
        .replace('-', "--")
        .replace('/', "-")
        .replace('.', "_")
}

/// Create the output directory if it does not exist yet.
pub fn make_output_directory(dir: &Path) -> Result<()> {
    ensure_dir(dir)
}

/// Documentation renderer for one project.
pub struct Documentation<'a> {
    project: &'a Project,
    known_paths: HashSet<String>,
}

impl<'a> Documentation<'a> {
    /// Create a renderer over an opened project.
    pub fn new(project: &'a Project) -> Self {
        let known_paths = project
            .workflows()
            .iter()
            .map(|wf| project.relative_path(wf.file_path()))
            .collect();

        Documentation {
            project,
            known_paths,
        }
    }

    /// The workflow named by the manifest's `main`.
    ///
    /// `None` for libraries, and when `main` points at a file that was not
    /// discovered (or failed to parse).
    pub fn main_workflow(&self) -> Option<&'a Workflow> {
        let main = self.project.main()?;
        let main_path = normalize_path(&self.project.directory().join(main.replace('\\', "/")));

        self.project
            .workflows()
            .iter()
            .find(|wf| normalize_path(wf.file_path()) == main_path)
    }

    /// Path of a workflow relative to the project directory.
    pub fn workflow_relative_path(&self, workflow: &Workflow) -> String {
        self.project.relative_path(workflow.file_path())
    }

    /// Anchor id of a workflow's section.
    pub fn workflow_id(&self, workflow: &Workflow) -> String {
        workflow_id(&self.workflow_relative_path(workflow))
    }

    /// A workflow's section; empty for `None`.
    pub fn render_workflow_section(&self, workflow: Option<&Workflow>) -> Result<String> {
        let Some(workflow) = workflow else {
            return Ok(String::new());
        };
        let namespaces = self.project.namespaces();

        let arguments: Vec<ArgumentRow<'_>> = workflow
            .arguments()
            .iter()
            .map(|arg| ArgumentRow {
                name: &arg.name,
                direction: arg.direction.as_str(),
                type_name: &arg.type_name,
                annotation: arg.annotation.as_deref().unwrap_or_default(),
            })
            .collect();

        let variables: Vec<VariableRow<'_>> = workflow
            .variables()
            .iter()
            .map(|var| VariableRow {
                name: &var.name,
                type_name: strip_namespace_prefix(&var.data_type),
                default_value: if var.is_default_truncated() {
                    format!("{}...", var.default_summary())
                } else {
                    var.default_summary().to_string()
                },
                annotation: &var.annotation,
            })
            .collect();

        let invocations: Vec<Invocation<'_>> = workflow
            .referenced_workflows()
            .iter()
            .map(|path| Invocation {
                path,
                target_id: self.link_target(path),
            })
            .collect();

        let id = self.workflow_id(workflow);
        let path = self.workflow_relative_path(workflow);

        let section = html::workflow_section(&WorkflowSection {
            id: &id,
            title: workflow.display_name().unwrap_or_default(),
            path: &path,
            annotation: workflow.annotation(namespaces).unwrap_or_default(),
            arguments: &arguments,
            variables: &variables,
            invocations: &invocations,
        })?;
        Ok(section)
    }

    /// Table of contents: the main workflow, then every other workflow.
    pub fn render_table_of_contents(&self) -> Result<String> {
        let main = self.main_workflow();

        let entries: Vec<TocEntry<'_>> = main
            .into_iter()
            .chain(self.other_workflows(main))
            .map(|wf| TocEntry {
                id: self.workflow_id(wf),
                label: wf.display_name().unwrap_or_default(),
                path: self.workflow_relative_path(wf),
            })
            .collect();

        Ok(html::table_of_contents(&entries)?)
    }

    /// Render the complete report.
    pub fn build(&self) -> Result<String> {
        let main = self.main_workflow();

        let others = self
            .other_workflows(main)
            .map(|wf| self.render_workflow_section(Some(wf)))
            .collect::<Result<String>>()?;

        let failures: Vec<FailureRow> = self
            .project
            .failures()
            .iter()
            .map(|f| FailureRow {
                path: self.project.relative_path(&f.path),
                message: f.error.to_string(),
            })
            .collect();

        let header = PageHeader {
            name: self.project.name(),
            version: self.project.version(),
            description: self.project.description(),
            skipped: failures.len(),
        };

        let toc = self.render_table_of_contents()?;
        let main = self.render_workflow_section(main)?;
        let failures = html::failure_section(&failures)?;

        let page = html::page(
            &header,
            &PageBody {
                toc: &toc,
                main: &main,
                others: &others,
                failures: &failures,
            },
        )?;
        Ok(page)
    }

    /// Render the report into `path`, creating its directory.
    pub fn write(&self, path: &Path) -> Result<()> {
        let content = self.build()?;

        if let Some(dir) = path.parent() {
            make_output_directory(dir)?;
        }
        write_string(path, &content)?;

        tracing::info!("documentation written to {}", path.display());
        Ok(())
    }

    /// Every workflow except `main`, compared by file path.
    fn other_workflows(
        &self,
        main: Option<&'a Workflow>,
    ) -> impl Iterator<Item = &'a Workflow> + 'a {
        let project = self.project;
        let main_path = main.map(Workflow::file_path);
        project
            .workflows()
            .iter()
            .filter(move |wf| Some(wf.file_path()) != main_path)
    }

    fn link_target(&self, referenced: &str) -> Option<String> {
        let path = to_slash(&normalize_path(Path::new(referenced)));
        self.known_paths.contains(&path).then(|| workflow_id(&path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::{Project, ProjectOptions};
    use crate::test_support::{workflow_xaml, ProjectFixture, BROKEN_XAML, MAIN_XAML};
    use tempfile::TempDir;

    fn open(fixture: ProjectFixture) -> (TempDir, Project) {
        let tmp = TempDir::new().unwrap();
        let dir = fixture.write_to(tmp.path()).unwrap();
        let project = Project::open(&dir, &ProjectOptions::default()).unwrap();
        (tmp, project)
    }

    fn reframework() -> ProjectFixture {
        ProjectFixture::process("REFramework")
            .with_workflow("Main.xaml", MAIN_XAML)
            .with_workflow(
                "Framework/InitAllSettings.xaml",
                workflow_xaml("Initialize All Settings", "Reads Config.xlsx", ""),
            )
            .with_workflow("Framework/Process.xaml", workflow_xaml("Process", "", ""))
            .with_workflow(
                "Framework/Set-Transaction.Status.xaml",
                workflow_xaml("SetTransactionStatus", "", ""),
            )
    }

    #[test]
    fn test_workflow_id_encoding() {
        assert_eq!(workflow_id("Main.xaml"), "Main_xaml");
        assert_eq!(
            workflow_id("Framework/Set-Transaction.Status.xaml"),
            "Framework-Set--Transaction_Status_xaml"
        );
    }

    #[test]
    fn test_workflow_id_has_no_collisions() {
        let paths = [
            "Main.xaml",
            "a-b.xaml",
            "a/b.xaml",
            "a--b.xaml",
            "a/-b.xaml",
            "a-/b.xaml",
            "a//b.xaml",
            "Framework/Process.xaml",
            "Framework-Process.xaml",
            "Framework/Process/Main.xaml",
            "Framework-Process-Main.xaml",
        ];
        let ids: HashSet<String> = paths.iter().map(|p| workflow_id(p)).collect();
        assert_eq!(ids.len(), paths.len());
    }

    #[test]
    fn test_main_workflow() {
        let (_tmp, project) = open(reframework());
        let docs = Documentation::new(&project);

        let main = docs.main_workflow().unwrap();
        assert_eq!(main.display_name(), Some("General Business Process"));
        assert_eq!(docs.workflow_relative_path(main), "Main.xaml");
        assert_eq!(docs.workflow_id(main), "Main_xaml");
    }

    #[test]
    fn test_main_workflow_normalizes_manifest_path() {
        let (_tmp, project) = open(
            reframework().with_main(Some("./Framework/..\\Main.xaml")),
        );
        let docs = Documentation::new(&project);
        assert!(docs.main_workflow().is_some());
    }

    #[test]
    fn test_main_workflow_missing_file() {
        let (_tmp, project) = open(reframework().with_main(Some("Nope.xaml")));
        let docs = Documentation::new(&project);

        assert!(docs.main_workflow().is_none());
        let html = docs.build().unwrap();
        assert_eq!(html.matches("<dt>").count(), 4);
    }

    #[test]
    fn test_library_has_no_main_section() {
        let (_tmp, project) = open(
            ProjectFixture::library("Lib")
                .with_workflow("Get Data.xaml", workflow_xaml("Get Data", "", ""))
                .with_workflow("Put Data.xaml", workflow_xaml("Put Data", "", "")),
        );
        let docs = Documentation::new(&project);

        assert!(docs.main_workflow().is_none());
        assert_eq!(docs.render_workflow_section(None).unwrap(), "");

        let html = docs.build().unwrap();
        assert_eq!(html.matches("<h2 id=").count(), 2);
        assert_eq!(html.matches("<dt>").count(), 2);
    }

    #[test]
    fn test_main_rendered_first_and_once() {
        let (_tmp, project) = open(reframework());
        let html = Documentation::new(&project).build().unwrap();

        let first_section = html.find("<h2 id=").unwrap();
        assert!(html[first_section..]
            .starts_with(r#"<h2 id="Main_xaml">General Business Process</h2>"#));

        assert_eq!(html.matches(r#"<h2 id="Main_xaml">"#).count(), 1);
        assert_eq!(html.matches("<h2 id=").count(), 4);
    }

    #[test]
    fn test_table_of_contents_one_entry_per_workflow() {
        let (_tmp, project) = open(reframework());
        let toc = Documentation::new(&project)
            .render_table_of_contents()
            .unwrap();

        assert_eq!(toc.matches("<dt>").count(), 4);
        assert_eq!(toc.matches(r##"href="#Main_xaml""##).count(), 1);

        let main_entry = toc.find(r##"href="#Main_xaml""##).unwrap();
        let first_entry = toc.find("href=").unwrap();
        assert_eq!(main_entry, first_entry);
        assert!(toc.contains("Set-Transaction.Status.xaml</dd>"));
    }

    #[test]
    fn test_section_contents() {
        let (_tmp, project) = open(reframework());
        let docs = Documentation::new(&project);
        let section = docs
            .render_workflow_section(docs.main_workflow())
            .unwrap();

        assert!(section.contains("<p>File name: Main.xaml</p>"));
        assert!(section.contains(
            "<p class='annotation'>Entry point of the robotic enterprise framework.</p>"
        ));
        assert!(section.contains("<td>in_OrchestratorQueueName</td>"));
        assert!(section.contains("<td>Out</td>"));
        assert!(section.contains("<td>Int32</td>"));
        assert!(section.contains("<td class='annotation'>Queue to work on</td>"));

        assert!(section.contains("<h3>Variables</h3>"));
        assert!(section.contains("<td>Dictionary(String, Object)</td>"));

        assert!(section.contains(r##"<li><a href="#Framework-InitAllSettings_xaml">Framework"##));
        assert!(section.contains("InitAllSettings.xaml</a></li>"));
        assert_eq!(section.matches(r##"href="#Framework-Process_xaml""##).count(), 2);
    }

    #[test]
    fn test_project_text_is_escaped() {
        let (_tmp, project) = open(
            ProjectFixture::library("Escape")
                .with_description(Some("<script>alert('x')</script>"))
                .with_workflow(
                    "Evil.xaml",
                    workflow_xaml("&lt;img src=x&gt;", "a &amp; b", ""),
                ),
        );
        let html = Documentation::new(&project).build().unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#x27;x&#x27;)"));
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x&gt;"));
        assert!(html.contains("<p class='annotation'>a &amp; b</p>"));
    }

    #[test]
    fn test_failed_workflows_are_listed() {
        let (_tmp, project) = open(reframework().with_workflow("Broken.xaml", BROKEN_XAML));
        let html = Documentation::new(&project).build().unwrap();

        assert!(html.contains("Incomplete: 1 workflow(s) could not be analyzed."));
        assert!(html.contains("<li><code>Broken.xaml</code>: malformed XML in"));
        assert_eq!(html.matches("<dt>").count(), 4);
    }

    #[test]
    fn test_write_creates_directory() {
        let (tmp, project) = open(reframework());
        let target = tmp.path().join("deliverables/documentation/Documentation.html");

        Documentation::new(&project).write(&target).unwrap();
        let written = std::fs::read_to_string(target).unwrap();
        assert!(written.starts_with("<!doctype html>"));
        assert!(written.contains("<h1>REFramework</h1>"));
    }
}

//! Workflow documents.
//!
//! A workflow is one `.xaml` file. Its root element (`Activity`) holds the
//! argument declarations under `x:Members`, default values of `In` arguments
//! as `this:<Workflow>.<argument>` attributes, and a single top-level
//! activity (usually a `Sequence`, `Flowchart` or `StateMachine`) next to
//! designer scaffolding such as `TextExpression.NamespacesForImplementation`.
//!
//! Files are read with recovery (see [`XamlDocument`]): mismatched or
//! unclosed tags and unknown entities still yield whatever could be read.
//! Everything is extracted in one pass and the resulting [`Workflow`] owns
//! its data, so the file is never touched again.

use std::path::{Path, PathBuf};

use crate::analyze::argument::WorkflowArgument;
use crate::analyze::error::AnalyzeError;
use crate::analyze::variable::Variable;
use crate::xaml::{XamlDocument, XamlElement, XamlNamespaces, XamlNode};

/// An element carrying a UI `Selector`, resolved to the activity that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorOwner {
    /// The owning activity (or the element itself when it is not a target wrapper)
    pub element: XamlElement,

    /// The selector text
    pub selector: String,

    /// Whether the selector sat on a `Target` wrapper below the owner
    pub via_target: bool,
}

/// A parsed workflow file.
#[derive(Debug, Clone)]
pub struct Workflow {
    file_path: PathBuf,
    display_name: Option<String>,
    root_activity: Option<XamlElement>,
    arguments: Vec<WorkflowArgument>,
    variables: Vec<Variable>,
    referenced_workflows: Vec<String>,
    selector_owners: Vec<SelectorOwner>,
}

impl Workflow {
    /// Read and parse a workflow file.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected.
    pub fn load(path: &Path, namespaces: &XamlNamespaces) -> Result<Self, AnalyzeError> {
        let bytes = std::fs::read(path).map_err(|source| AnalyzeError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(path, &String::from_utf8_lossy(&bytes), namespaces)
    }

    /// Parse workflow content. `path` is kept as the workflow's identity.
    pub fn parse(
        path: &Path,
        source: &str,
        namespaces: &XamlNamespaces,
    ) -> Result<Self, AnalyzeError> {
        // Studio writes a byte order mark
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);

        let document = XamlDocument::parse(source).map_err(|source| AnalyzeError::XmlParse {
            path: path.to_path_buf(),
            source,
        })?;
        if document.is_recovered() {
            tracing::warn!(
                "{} contains malformed markup; documenting what could be read",
                path.display()
            );
        }

        let root = document.root();
        let root_activity = find_root_activity(root, namespaces);

        let arguments = parse_arguments(path, root, namespaces)?;

        let variables: Vec<Variable> = root
            .descendants()
            .skip(1)
            .filter(|n| n.has_tag(namespaces.activities, "Variable"))
            .map(|n| Variable::parse(n.element().clone(), namespaces))
            .collect();

        let referenced_workflows = root_activity
            .map(|activity| find_invoked_workflows(path, activity, namespaces))
            .unwrap_or_default();

        let selector_owners = find_selector_owners(root);

        let root_activity = root_activity.map(|activity| activity.element().clone());
        let display_name = root_activity
            .as_ref()
            .and_then(|a| a.attribute("DisplayName"))
            .map(str::to_string);

        tracing::debug!(
            "parsed {} ({} arguments, {} variables, {} invocations)",
            path.display(),
            arguments.len(),
            variables.len(),
            referenced_workflows.len()
        );

        Ok(Workflow {
            file_path: path.to_path_buf(),
            display_name,
            root_activity,
            arguments,
            variables,
            referenced_workflows,
            selector_owners,
        })
    }

    /// The file this workflow was read from.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// `DisplayName` of the root activity.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Annotation of the root activity.
    pub fn annotation(&self, namespaces: &XamlNamespaces) -> Option<&str> {
        self.root_activity.as_ref()?.annotation(namespaces)
    }

    /// The first top-level activity that is not `TextExpression` scaffolding.
    pub fn root_activity(&self) -> Option<&XamlElement> {
        self.root_activity.as_ref()
    }

    /// Declared arguments, in document order.
    pub fn arguments(&self) -> &[WorkflowArgument] {
        &self.arguments
    }

    /// Variables of every scope, in document order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// `WorkflowFileName` of each `InvokeWorkflowFile`, with `/` separators.
    ///
    /// Not de-duplicated; a file invoked twice appears twice.
    pub fn referenced_workflows(&self) -> &[String] {
        &self.referenced_workflows
    }

    /// Activities that carry a UI selector.
    pub fn elements_with_selectors(&self) -> &[SelectorOwner] {
        &self.selector_owners
    }
}

fn find_root_activity<'a>(
    root: XamlNode<'a>,
    namespaces: &XamlNamespaces,
) -> Option<XamlNode<'a>> {
    root.children().find(|child| {
        let name = child.element().name();
        name.namespace.as_deref() == Some(namespaces.activities)
            && !name.local.contains("TextExpression")
    })
}

fn parse_arguments(
    path: &Path,
    root: XamlNode<'_>,
    namespaces: &XamlNamespaces,
) -> Result<Vec<WorkflowArgument>, AnalyzeError> {
    root.children()
        .filter(|n| n.has_tag(namespaces.xaml, "Members"))
        .flat_map(|members| members.children())
        .filter(|n| n.has_tag(namespaces.xaml, "Property"))
        .map(|property| {
            let element = property.element();
            WorkflowArgument::parse(element, root.element(), namespaces).map_err(|source| {
                AnalyzeError::InvalidArgument {
                    path: path.to_path_buf(),
                    line: element.line(),
                    source: Box::new(source),
                }
            })
        })
        .collect()
}

fn find_invoked_workflows(
    path: &Path,
    activity: XamlNode<'_>,
    namespaces: &XamlNamespaces,
) -> Vec<String> {
    activity
        .descendants()
        .skip(1)
        .filter(|n| n.has_tag(namespaces.uipath, "InvokeWorkflowFile"))
        .filter_map(|invoke| match invoke.element().attribute("WorkflowFileName") {
            Some(file_name) => Some(file_name.replace('\\', "/")),
            None => {
                tracing::warn!(
                    "InvokeWorkflowFile without WorkflowFileName in {} (line {})",
                    path.display(),
                    invoke.element().line()
                );
                None
            }
        })
        .collect()
}

fn is_target_wrapper(node: XamlNode<'_>) -> bool {
    node.element().local_tag_name().ends_with("Target")
}

/// Resolve each `Selector` to its logical activity.
///
/// Selectors usually sit on a `Target` element nested in a `<Activity>.Target`
/// property element, so target wrappers are skipped on the way up. An element
/// whose every ancestor is a wrapper has no owner and is left out.
fn find_selector_owners(root: XamlNode<'_>) -> Vec<SelectorOwner> {
    root.descendants()
        .skip(1)
        .filter_map(|node| {
            let selector = node.element().attribute("Selector")?;

            if !is_target_wrapper(node) {
                return Some(SelectorOwner {
                    element: node.element().clone(),
                    selector: selector.to_string(),
                    via_target: false,
                });
            }

            match node.ancestors().skip(1).find(|a| !is_target_wrapper(*a)) {
                Some(owner) => Some(SelectorOwner {
                    element: owner.element().clone(),
                    selector: selector.to_string(),
                    via_target: true,
                }),
                None => {
                    tracing::debug!(
                        "selector on <{}> has no non-target ancestor",
                        node.element().local_tag_name()
                    );
                    None
                }
            }
        })
        .collect()
}

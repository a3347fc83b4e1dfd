//! Workflow variables.

use std::fmt;

use crate::xaml::{XamlElement, XamlNamespaces};

/// A `Variable` declared in some scope of a workflow.
///
/// Variables are optional metadata, so missing attributes read as empty
/// strings instead of failing the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    element: XamlElement,

    /// Declared type, as written in `x:TypeArguments`
    pub data_type: String,

    /// Default value expression
    pub default_value: String,

    /// Variable name
    pub name: String,

    /// Not present in the XAML; always `false`
    pub read_only: bool,

    /// Designer annotation
    pub annotation: String,
}

impl Variable {
    /// Read a variable from its declaration element.
    pub fn parse(element: XamlElement, namespaces: &XamlNamespaces) -> Self {
        let data_type = element
            .attribute_ns(namespaces.xaml, "TypeArguments")
            .unwrap_or_default()
            .to_string();
        let default_value = element.attribute("Default").unwrap_or_default().to_string();
        let name = element.attribute("Name").unwrap_or_default().to_string();
        let annotation = element.annotation(namespaces).unwrap_or_default().to_string();

        Variable {
            element,
            data_type,
            default_value,
            name,
            read_only: false,
            annotation,
        }
    }

    /// The declaration element.
    pub fn element(&self) -> &XamlElement {
        &self.element
    }

    /// First line of the default value, for one-line summaries.
    pub fn default_summary(&self) -> &str {
        self.default_value.lines().next().unwrap_or_default()
    }

    /// Whether [`Self::default_summary`] drops part of the default value.
    pub fn is_default_truncated(&self) -> bool {
        self.default_value.lines().nth(1).is_some()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Variable \"{}\" ({}) = \"{}...\">",
            self.name,
            self.data_type,
            self.default_summary()
        )
    }
}

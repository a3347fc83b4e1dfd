//! Workflow arguments declared under `x:Members`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::analyze::error::AnalyzeError;
use crate::xaml::{strip_namespace_prefix, QualifiedName, XamlElement, XamlNamespaces};

/// Extracts the payload of `InArgument(...)` and friends.
///
/// The prefix is a loose character class on purpose: files in the wild
/// rely on it, so it is not narrowed to the three known spellings.
static ARGUMENT_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[OIntu]+Argument\((.*)\)$").expect("argument type pattern is valid")
});

/// Data flow of an argument relative to its workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentDirection {
    In,
    Out,
    InOut,
}

impl ArgumentDirection {
    /// Classify a raw XAML type such as `InArgument(x:String)` by its prefix.
    pub fn from_raw_type(raw_type: &str) -> Option<Self> {
        if raw_type.starts_with("InArgument") {
            Some(ArgumentDirection::In)
        } else if raw_type.starts_with("OutArgument") {
            Some(ArgumentDirection::Out)
        } else if raw_type.starts_with("InOutArgument") {
            Some(ArgumentDirection::InOut)
        } else {
            None
        }
    }

    /// Get the direction as shown in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgumentDirection::In => "In",
            ArgumentDirection::Out => "Out",
            ArgumentDirection::InOut => "InOut",
        }
    }
}

impl fmt::Display for ArgumentDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `x:Property` argument declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowArgument {
    /// Argument name (empty when the declaration has no `Name`)
    pub name: String,

    /// Data flow direction
    pub direction: ArgumentDirection,

    /// Bare type name with namespace prefixes stripped, e.g. `String`
    pub type_name: String,

    /// Designer annotation
    pub annotation: Option<String>,

    /// Root attribute holding the default, in Clark notation
    /// (`{clr-namespace:}Main.in_Name`); only ever set for `In` arguments
    pub default_value: Option<String>,

    /// The expression stored in that attribute
    pub default_expression: Option<String>,
}

impl WorkflowArgument {
    /// Parse an argument declaration.
    ///
    /// `root` is the document root, whose `this:Workflow.<name>` attributes
    /// hold default values of `In` arguments.
    pub fn parse(
        element: &XamlElement,
        root: &XamlElement,
        namespaces: &XamlNamespaces,
    ) -> Result<Self, AnalyzeError> {
        let name = element.attribute("Name").unwrap_or_default().to_string();

        let raw_type = element
            .attribute("Type")
            .ok_or_else(|| AnalyzeError::MissingArgumentType { name: name.clone() })?;

        let direction = ArgumentDirection::from_raw_type(raw_type).ok_or_else(|| {
            AnalyzeError::UnknownArgumentDirection {
                name: name.clone(),
                raw_type: raw_type.to_string(),
            }
        })?;

        let payload = ARGUMENT_TYPE
            .captures(raw_type)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| AnalyzeError::MalformedArgumentType {
                name: name.clone(),
                raw_type: raw_type.to_string(),
            })?;
        let type_name = strip_namespace_prefix(payload.as_str());

        let default = if direction == ArgumentDirection::In {
            find_default(root, &name, namespaces)
        } else {
            None
        };
        let (default_value, default_expression) = match default {
            Some((attr, value)) => (Some(attr.to_string()), Some(value.to_string())),
            None => (None, None),
        };

        Ok(WorkflowArgument {
            annotation: element.annotation(namespaces).map(str::to_string),
            name,
            direction,
            type_name,
            default_value,
            default_expression,
        })
    }
}

impl fmt::Display for WorkflowArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.name, self.direction, self.type_name)
    }
}

/// First root attribute named `{clr-namespace:}<Anything>.<name>`.
fn find_default<'a>(
    root: &'a XamlElement,
    name: &str,
    namespaces: &XamlNamespaces,
) -> Option<(&'a QualifiedName, &'a str)> {
    if name.is_empty() {
        return None;
    }

    let suffix = format!(".{}", name);
    root.attributes()
        .find(|(attr, _)| {
            attr.namespace.as_deref() == Some(namespaces.this) && attr.local.ends_with(&suffix)
        })
}

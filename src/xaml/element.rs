//! Owned element snapshots and attribute access.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::XamlNamespaces;

/// Matches the short `prefix:` tokens XAML uses inside type strings.
static NAMESPACE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z]+:").expect("namespace prefix pattern is valid"));

/// Remove every `[a-z]+:` run from `text`.
///
/// This is a textual heuristic rather than namespace resolution: it applies
/// anywhere in the string, so `scg:Dictionary(x:String, x:Object)` becomes
/// `Dictionary(String, Object)`.
pub fn strip_namespace_prefix(text: &str) -> String {
    NAMESPACE_PREFIX.replace_all(text, "").into_owned()
}

/// An element or attribute name with its resolved namespace URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Namespace URI, if the name is qualified
    pub namespace: Option<String>,

    /// Local part of the name
    pub local: String,
}

impl QualifiedName {
    /// Create an unqualified name.
    pub fn local(local: impl Into<String>) -> Self {
        QualifiedName {
            namespace: None,
            local: local.into(),
        }
    }

    /// Create a name in the given namespace.
    pub fn qualified(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        QualifiedName {
            namespace: Some(namespace.into()),
            local: local.into(),
        }
    }

    /// Check whether this name is `local` in namespace `namespace`.
    pub fn matches(&self, namespace: Option<&str>, local: &str) -> bool {
        self.namespace.as_deref() == namespace && self.local == local
    }
}

/// Clark notation: `{uri}local`, or just `local` when unqualified.
impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

/// An owned copy of one XML element's name and attributes.
///
/// Namespace prefixes are already resolved, so lookups compare URIs and
/// never depend on the prefixes a file happens to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XamlElement {
    name: QualifiedName,
    attributes: Vec<(QualifiedName, String)>,
    line: u32,
}

impl XamlElement {
    /// Create an element snapshot by hand.
    pub fn new(name: QualifiedName) -> Self {
        XamlElement {
            name,
            attributes: Vec::new(),
            line: 0,
        }
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: QualifiedName, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    /// Set the source line.
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    /// The element's qualified tag name.
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// The local part of the tag name, e.g. `Click.Target`.
    pub fn local_tag_name(&self) -> &str {
        &self.name.local
    }

    /// 1-based source line of the element start tag, 0 if built by hand.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// All attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&QualifiedName, &str)> {
        self.attributes.iter().map(|(name, value)| (name, value.as_str()))
    }

    /// Look up an unqualified attribute.
    ///
    /// Returns `None` when absent, which callers keep distinct from an
    /// attribute that is present but empty.
    pub fn attribute(&self, local: &str) -> Option<&str> {
        self.lookup(None, local)
    }

    /// Look up an attribute in a namespace.
    pub fn attribute_ns(&self, namespace: &str, local: &str) -> Option<&str> {
        self.lookup(Some(namespace), local)
    }

    /// The designer annotation attached to this element, if any.
    pub fn annotation(&self, namespaces: &XamlNamespaces) -> Option<&str> {
        self.attribute_ns(
            namespaces.presentation2010,
            XamlNamespaces::ANNOTATION_ATTRIBUTE,
        )
    }

    fn lookup(&self, namespace: Option<&str>, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name.matches(namespace, local))
            .map(|(_, value)| value.as_str())
    }
}

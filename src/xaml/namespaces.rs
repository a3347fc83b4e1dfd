//! Well-known namespace URIs of workflow documents.
//!
//! The table is a plain immutable value. Parsing code receives it by
//! reference instead of consulting shared state, so tests can inject a
//! different table without touching the defaults.

/// Namespace URIs used for qualified element and attribute lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XamlNamespaces {
    /// Workflow activities (`Sequence`, `Flowchart`, `Variable`, ...)
    pub activities: &'static str,

    /// Designer presentation metadata, 2009 schema
    pub presentation: &'static str,

    /// Designer presentation metadata, 2010 schema (annotations live here)
    pub presentation2010: &'static str,

    /// CLR namespace used by argument default values on the document root
    pub this: &'static str,

    /// Vendor activities (`InvokeWorkflowFile`, UI automation, ...)
    pub uipath: &'static str,

    /// XAML member and type system (`x:Members`, `x:Property`, `x:TypeArguments`)
    pub xaml: &'static str,
}

impl XamlNamespaces {
    /// The namespaces written by UiPath Studio.
    pub const UIPATH: XamlNamespaces = XamlNamespaces {
        activities: "http://schemas.microsoft.com/netfx/2009/xaml/activities",
        presentation: "http://schemas.microsoft.com/netfx/2009/xaml/activities/presentation",
        presentation2010: "http://schemas.microsoft.com/netfx/2010/xaml/activities/presentation",
        this: "clr-namespace:",
        uipath: "http://schemas.uipath.com/workflow/activities",
        xaml: "http://schemas.microsoft.com/winfx/2006/xaml",
    };

    /// Local name of the annotation attribute in the presentation namespace.
    pub const ANNOTATION_ATTRIBUTE: &'static str = "Annotation.AnnotationText";
}

impl Default for XamlNamespaces {
    fn default() -> Self {
        Self::UIPATH
    }
}

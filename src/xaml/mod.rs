//! XAML document primitives.
//!
//! Workflow files are loosely schematized XAML. Everything the analyzer knows
//! about them goes through two small pieces:
//! - [`XamlNamespaces`]: the fixed table of namespace URIs used for qualified lookups
//! - [`XamlElement`]: an owned snapshot of one element and its attributes
//! - [`XamlDocument`]: the element tree of one file, read with recovery

pub mod document;
pub mod element;
pub mod namespaces;

pub use document::{XamlDocument, XamlError, XamlNode};
pub use element::{strip_namespace_prefix, QualifiedName, XamlElement};
pub use namespaces::XamlNamespaces;

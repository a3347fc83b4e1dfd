//! Recovering XAML reader.
//!
//! Workflow files are edited by hand and by third-party tools, so the reader
//! keeps whatever structure it can instead of rejecting the file:
//! - end tags that do not match close the nearest open element of that name,
//!   implicitly closing everything opened after it
//! - end tags with no open element are ignored
//! - elements still open at end of input are closed there
//! - a syntax error stops reading; everything read before it is kept
//! - attribute values with unknown entities keep their raw text
//!
//! Document type declarations are skipped, so no entity they declare is
//! ever expanded. Only input that yields no element at all is an error.

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use thiserror::Error;

use super::element::{QualifiedName, XamlElement};

/// Namespace bound to the reserved `xml` prefix.
const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Error for input that contains no usable element.
#[derive(Debug, Error)]
pub enum XamlError {
    #[error("syntax error at byte {position} before any element")]
    Syntax {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("no root element")]
    NoRootElement,
}

#[derive(Debug)]
struct NodeData {
    element: XamlElement,
    parent: Option<usize>,
    children: Vec<usize>,
    /// One past the last node of this subtree
    end: usize,
}

/// A parsed document. Nodes are stored in document order, so every subtree
/// is a contiguous range.
#[derive(Debug)]
pub struct XamlDocument {
    nodes: Vec<NodeData>,
    recovered: bool,
}

impl XamlDocument {
    /// Parse `source`, recovering from malformed markup where possible.
    pub fn parse(source: &str) -> Result<Self, XamlError> {
        let mut reader = Reader::from_str(source);
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        let mut builder = TreeBuilder::new(source);

        loop {
            let position = reader.buffer_position() as u64;
            match reader.read_event() {
                Ok(Event::Start(start)) => {
                    if builder.is_complete() {
                        break;
                    }
                    builder.open(&start, position, false);
                }
                Ok(Event::Empty(start)) => {
                    if builder.is_complete() {
                        break;
                    }
                    builder.open(&start, position, true);
                }
                Ok(Event::End(end)) => {
                    builder.close(&String::from_utf8_lossy(end.name().as_ref()));
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(source) if builder.nodes.is_empty() => {
                    return Err(XamlError::Syntax { position, source });
                }
                Err(e) => {
                    tracing::debug!("stopped reading at byte {}: {}", position, e);
                    builder.recovered = true;
                    break;
                }
            }
        }

        builder.finish()
    }

    /// The document element.
    pub fn root(&self) -> XamlNode<'_> {
        XamlNode {
            document: self,
            index: 0,
        }
    }

    /// Whether malformed markup had to be repaired or skipped.
    pub fn is_recovered(&self) -> bool {
        self.recovered
    }
}

/// A reference to one element of a [`XamlDocument`].
#[derive(Debug, Clone, Copy)]
pub struct XamlNode<'a> {
    document: &'a XamlDocument,
    index: usize,
}

impl<'a> XamlNode<'a> {
    fn data(self) -> &'a NodeData {
        &self.document.nodes[self.index]
    }

    fn at(self, index: usize) -> XamlNode<'a> {
        XamlNode {
            document: self.document,
            index,
        }
    }

    /// The element's name and attributes.
    pub fn element(self) -> &'a XamlElement {
        &self.data().element
    }

    /// Check the element's namespace and local name.
    pub fn has_tag(self, namespace: &str, local: &str) -> bool {
        self.element().name().matches(Some(namespace), local)
    }

    pub fn parent(self) -> Option<XamlNode<'a>> {
        self.data().parent.map(|index| self.at(index))
    }

    /// Child elements in document order.
    pub fn children(self) -> impl Iterator<Item = XamlNode<'a>> + 'a {
        self.data().children.iter().map(move |&index| self.at(index))
    }

    /// This element and everything below it, in document order.
    pub fn descendants(self) -> impl Iterator<Item = XamlNode<'a>> + 'a {
        (self.index..self.data().end).map(move |index| self.at(index))
    }

    /// This element, its parent, and so on up to the document element.
    pub fn ancestors(self) -> impl Iterator<Item = XamlNode<'a>> + 'a {
        std::iter::successors(Some(self), |node| node.parent())
    }
}

struct OpenElement {
    index: usize,
    raw_name: String,
    scope_len: usize,
}

struct TreeBuilder<'s> {
    source: &'s str,
    nodes: Vec<NodeData>,
    open: Vec<OpenElement>,
    /// In-scope `(prefix, uri)` declarations; the default namespace has prefix ""
    bindings: Vec<(String, String)>,
    recovered: bool,
    scanned: usize,
    line: u32,
}

impl<'s> TreeBuilder<'s> {
    fn new(source: &'s str) -> Self {
        TreeBuilder {
            source,
            nodes: Vec::new(),
            open: Vec::new(),
            bindings: Vec::new(),
            recovered: false,
            scanned: 0,
            line: 1,
        }
    }

    /// The document element has been closed; anything after it is ignored.
    fn is_complete(&self) -> bool {
        !self.nodes.is_empty() && self.open.is_empty()
    }

    fn line_at(&mut self, position: u64) -> u32 {
        let len = self.source.len();
        let position = usize::try_from(position).map_or(len, |p| p.min(len));
        if position > self.scanned {
            let newlines = self.source.as_bytes()[self.scanned..position]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.line += newlines as u32;
            self.scanned = position;
        }
        self.line
    }

    fn open(&mut self, start: &BytesStart<'_>, position: u64, self_closing: bool) {
        let line = self.line_at(position);
        let raw_name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let scope_len = self.bindings.len();

        let mut raw_attributes = Vec::new();
        let mut attributes = start.attributes();
        attributes.with_checks(false);
        for attr in attributes {
            match attr {
                Ok(attr) => {
                    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                    let value = attribute_value(&attr);
                    if key == "xmlns" {
                        self.bindings.push((String::new(), value));
                    } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                        self.bindings.push((prefix.to_string(), value));
                    } else {
                        raw_attributes.push((key, value));
                    }
                }
                Err(e) => {
                    tracing::debug!("skipping malformed attribute on <{}>: {}", raw_name, e);
                    self.recovered = true;
                }
            }
        }

        let mut element = XamlElement::new(self.resolve_element(&raw_name)).with_line(line);
        for (key, value) in raw_attributes {
            element = element.with_attribute(self.resolve_attribute(&key), value);
        }

        let index = self.nodes.len();
        let parent = self.open.last().map(|open| open.index);
        if let Some(parent) = parent {
            self.nodes[parent].children.push(index);
        }
        self.nodes.push(NodeData {
            element,
            parent,
            children: Vec::new(),
            end: index + 1,
        });

        if self_closing {
            self.bindings.truncate(scope_len);
        } else {
            self.open.push(OpenElement {
                index,
                raw_name,
                scope_len,
            });
        }
    }

    fn close(&mut self, raw_name: &str) {
        let Some(depth) = self.open.iter().rposition(|open| open.raw_name == raw_name) else {
            tracing::debug!("ignoring unmatched end tag </{}>", raw_name);
            self.recovered = true;
            return;
        };

        if depth + 1 != self.open.len() {
            self.recovered = true;
        }
        while self.open.len() > depth {
            self.pop();
        }
    }

    fn pop(&mut self) {
        if let Some(open) = self.open.pop() {
            self.nodes[open.index].end = self.nodes.len();
            self.bindings.truncate(open.scope_len);
        }
    }

    fn finish(mut self) -> Result<XamlDocument, XamlError> {
        if !self.open.is_empty() {
            tracing::debug!("closing {} element(s) left open at end of input", self.open.len());
            self.recovered = true;
            while !self.open.is_empty() {
                self.pop();
            }
        }

        if self.nodes.is_empty() {
            return Err(XamlError::NoRootElement);
        }

        Ok(XamlDocument {
            nodes: self.nodes,
            recovered: self.recovered,
        })
    }

    fn lookup(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
            .filter(|uri| !uri.is_empty())
    }

    fn resolve_element(&self, raw_name: &str) -> QualifiedName {
        match raw_name.split_once(':') {
            Some((prefix, local)) => match self.lookup(prefix) {
                Some(uri) => QualifiedName::qualified(uri, local),
                // Unbound prefix: keep the whole name so it never matches a lookup
                None => QualifiedName::local(raw_name),
            },
            None => match self.lookup("") {
                Some(uri) => QualifiedName::qualified(uri, raw_name),
                None => QualifiedName::local(raw_name),
            },
        }
    }

    fn resolve_attribute(&self, raw_name: &str) -> QualifiedName {
        match raw_name.split_once(':') {
            Some(("xml", local)) => QualifiedName::qualified(XML_NAMESPACE, local),
            Some((prefix, local)) => match self.lookup(prefix) {
                Some(uri) => QualifiedName::qualified(uri, local),
                None => QualifiedName::local(raw_name),
            },
            None => QualifiedName::local(raw_name),
        }
    }
}

fn attribute_value(attr: &Attribute<'_>) -> String {
    match attr.unescape_value() {
        Ok(value) => value.into_owned(),
        Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WF: &str = "http://schemas.microsoft.com/netfx/2009/xaml/activities";

    fn tags(node: XamlNode<'_>) -> Vec<String> {
        node.descendants()
            .map(|n| n.element().local_tag_name().to_string())
            .collect()
    }

    #[test]
    fn test_well_formed_document() {
        let doc = XamlDocument::parse(&format!(
            r#"<Activity xmlns="{WF}" xmlns:x="urn:x">
  <x:Members><x:Property Name="a" /></x:Members>
  <Sequence DisplayName="Body" />
</Activity>"#
        ))
        .unwrap();

        assert!(!doc.is_recovered());
        let root = doc.root();
        assert!(root.has_tag(WF, "Activity"));
        assert_eq!(tags(root), vec!["Activity", "Members", "Property", "Sequence"]);
        assert_eq!(root.children().count(), 2);

        let property = root.descendants().nth(2).unwrap();
        assert!(property.has_tag("urn:x", "Property"));
        assert_eq!(property.element().line(), 2);
        let chain: Vec<&str> = property
            .ancestors()
            .map(|n| n.element().local_tag_name())
            .collect();
        assert_eq!(chain, vec!["Property", "Members", "Activity"]);
    }

    #[test]
    fn test_attributes_keep_document_order_and_namespaces() {
        let doc = XamlDocument::parse(r#"<a xmlns:x="urn:x" B="1" x:C="2" A="3" xml:lang="en"/>"#)
            .unwrap();
        let element = doc.root().element();

        let names: Vec<String> = element.attributes().map(|(n, _)| n.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "B",
                "{urn:x}C",
                "A",
                "{http://www.w3.org/XML/1998/namespace}lang"
            ]
        );
        assert_eq!(element.line(), 1);
    }

    #[test]
    fn test_unclosed_inner_element_is_closed_by_parent_end() {
        let doc = XamlDocument::parse(&format!(
            r#"<Activity xmlns="{WF}">
  <Sequence DisplayName="Recoverable"><Assign></Sequence>
</Activity>"#
        ))
        .unwrap();

        assert!(doc.is_recovered());
        let root = doc.root();
        assert_eq!(tags(root), vec!["Activity", "Sequence", "Assign"]);
        let sequence = root.children().next().unwrap();
        assert_eq!(sequence.element().attribute("DisplayName"), Some("Recoverable"));
        assert_eq!(sequence.children().count(), 1);
    }

    #[test]
    fn test_truncated_document_keeps_prefix() {
        let doc = XamlDocument::parse(&format!(
            r#"<Activity xmlns="{WF}"><Sequence DisplayName="Cut"><Assign To="x"#
        ))
        .unwrap();

        assert!(doc.is_recovered());
        assert_eq!(tags(doc.root()), vec!["Activity", "Sequence"]);
    }

    #[test]
    fn test_stray_end_tag_is_ignored() {
        let doc = XamlDocument::parse("<a><b/></c></a>").unwrap();
        assert!(doc.is_recovered());
        assert_eq!(tags(doc.root()), vec!["a", "b"]);
    }

    #[test]
    fn test_entities_are_not_expanded() {
        let doc = XamlDocument::parse(
            r#"<?xml version="1.0"?>
<!DOCTYPE a [<!ENTITY boom "boom">]>
<a name="&boom;" text="&lt;ok&gt;"/>"#,
        )
        .unwrap();
        let element = doc.root().element();

        assert_eq!(element.attribute("name"), Some("&boom;"));
        assert_eq!(element.attribute("text"), Some("<ok>"));
        assert_eq!(element.line(), 3);
    }

    #[test]
    fn test_content_after_root_is_ignored() {
        let doc = XamlDocument::parse("<a/><b/>").unwrap();
        assert_eq!(tags(doc.root()), vec!["a"]);
    }

    #[test]
    fn test_unbound_prefix_is_kept_verbatim() {
        let doc = XamlDocument::parse("<ui:Click />").unwrap();
        let name = doc.root().element().name();
        assert_eq!(name.namespace, None);
        assert_eq!(name.local, "ui:Click");
    }

    #[test]
    fn test_no_element_is_an_error() {
        assert!(matches!(
            XamlDocument::parse("just some text"),
            Err(XamlError::NoRootElement)
        ));
        assert!(matches!(XamlDocument::parse(""), Err(XamlError::NoRootElement)));
    }
}

//! Rendering nodes as XML text.
//!
//! [`Node`] implements [`Display`](std::fmt::Display) using the default
//! [`XmlSerializer`]; construct one yourself to control
//! [`Parameters`] or to write to an [`io::Write`] sink.
use std::fmt;
use std::io;

use ahash::HashSet;

use crate::entity::{escape_text, quote_attribute};
use crate::error::Error;
use crate::namespace::NamespaceBinding;
use crate::node::{Element, Node};

/// An XML declaration written before a document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Declaration {
    /// The encoding to declare, e.g. `UTF-8`. No encoding pseudo-attribute
    /// is written if this is `None`.
    pub encoding: Option<String>,
}

/// Serialization parameters.
///
/// ```rust
/// use xmlfrag::serializer::{Declaration, Parameters, XmlSerializer};
/// use xmlfrag::Element;
///
/// let serializer = XmlSerializer::new(Parameters {
///     declaration: Some(Declaration {
///         encoding: Some("UTF-8".to_string()),
///     }),
/// });
/// let mut out = Vec::new();
/// serializer.serialize_document(&mut out, &Element::named("doc")?)?;
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     r#"<?xml version="1.0" encoding="UTF-8"?><doc/>"#
/// );
/// # Ok::<(), xmlfrag::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parameters {
    /// Declaration written by [`XmlSerializer::serialize_document`].
    pub declaration: Option<Declaration>,
}

/// Serializes nodes to XML.
#[derive(Debug, Clone, Default)]
pub struct XmlSerializer {
    parameters: Parameters,
}

enum Edge<'a> {
    Start(&'a Node, &'a NamespaceBinding),
    End(&'a Element),
}

impl XmlSerializer {
    /// Create a serializer with the given parameters.
    pub fn new(parameters: Parameters) -> Self {
        XmlSerializer { parameters }
    }

    /// Serialize a node to a string.
    pub fn to_string(&self, node: &Node) -> String {
        let mut s = String::new();
        // writing to a String cannot fail
        let _ = self.write_node(&mut s, node);
        s
    }

    /// Serialize a node to a writer.
    pub fn serialize<W: io::Write>(&self, w: &mut W, node: &Node) -> Result<(), Error> {
        w.write_all(self.to_string(node).as_bytes())?;
        Ok(())
    }

    /// Serialize an element as a document, preceded by the declaration if
    /// one is configured.
    pub fn serialize_document<W: io::Write>(
        &self,
        w: &mut W,
        element: &Element,
    ) -> Result<(), Error> {
        let mut s = String::new();
        if let Some(declaration) = &self.parameters.declaration {
            match &declaration.encoding {
                Some(encoding) => s.push_str(&format!(
                    "<?xml version=\"1.0\" encoding={}?>",
                    quote_attribute(encoding)
                )),
                None => s.push_str("<?xml version=\"1.0\"?>"),
            }
        }
        // writing to a String cannot fail
        let _ = self.write_element(&mut s, element);
        w.write_all(s.as_bytes())?;
        Ok(())
    }

    fn write_element<W: fmt::Write>(&self, w: &mut W, element: &Element) -> fmt::Result {
        let empty = NamespaceBinding::Empty;
        let mut stack = Vec::new();
        self.open_element(w, element, &empty, &mut stack)?;
        self.write_edges(w, stack)
    }

    pub(crate) fn write_node<W: fmt::Write>(&self, w: &mut W, node: &Node) -> fmt::Result {
        tracing::trace!(node_type = ?node.node_type(), "serializing node");
        let empty = NamespaceBinding::Empty;
        self.write_edges(w, vec![Edge::Start(node, &empty)])
    }

    fn write_edges<'a, W: fmt::Write>(
        &self,
        w: &mut W,
        mut stack: Vec<Edge<'a>>,
    ) -> fmt::Result {
        while let Some(edge) = stack.pop() {
            match edge {
                Edge::Start(Node::Element(element), enclosing) => {
                    self.open_element(w, element, enclosing, &mut stack)?;
                }
                Edge::Start(node, _) => self.write_leaf(w, node)?,
                Edge::End(element) => write!(w, "</{}>", element.qname())?,
            }
        }
        Ok(())
    }

    fn open_element<'a, W: fmt::Write>(
        &self,
        w: &mut W,
        element: &'a Element,
        enclosing: &NamespaceBinding,
        stack: &mut Vec<Edge<'a>>,
    ) -> fmt::Result {
        write!(w, "<{}", element.qname())?;
        for (key, value) in element.attributes().iter() {
            write!(w, " {}={}", key, quote_attribute(value))?;
        }
        write_declarations(w, element.scope(), enclosing)?;
        if element.children().is_empty() {
            return w.write_str("/>");
        }
        w.write_str(">")?;
        stack.push(Edge::End(element));
        for child in element.children().iter().rev() {
            stack.push(Edge::Start(child, element.scope()));
        }
        Ok(())
    }

    fn write_leaf<W: fmt::Write>(&self, w: &mut W, node: &Node) -> fmt::Result {
        match node {
            Node::Text(text) => w.write_str(&escape_text(text.get())),
            Node::CData(cdata) => write!(w, "<![CDATA[{}]]>", cdata.get()),
            Node::EntityRef(entity_ref) => write!(w, "&{};", entity_ref.get()),
            Node::ProcessingInstruction(pi) => write!(w, "<?{} {}?>", pi.target(), pi.data()),
            // elements are opened by the caller
            Node::Element(_) => Ok(()),
        }
    }
}

/// Write the namespace declarations `scope` needs on top of `enclosing`.
///
/// For every prefix bound in `scope` (innermost binding wins), a
/// declaration is written unless `enclosing` already binds it to the same
/// URI. If `enclosing` has a default namespace and `scope` has none, the
/// default namespace is undeclared.
fn write_declarations<W: fmt::Write>(
    w: &mut W,
    scope: &NamespaceBinding,
    enclosing: &NamespaceBinding,
) -> fmt::Result {
    let mut seen = HashSet::default();
    let mut declarations = Vec::new();
    for binding in scope.iter() {
        let prefix = binding.prefix().unwrap_or("");
        if !seen.insert(prefix) || prefix == "xml" {
            continue;
        }
        let inherited = enclosing.find_prefix(prefix).and_then(NamespaceBinding::uri);
        if inherited != binding.uri() {
            declarations.push(binding);
        }
    }
    if !seen.contains("") && enclosing.find_prefix("").is_some() {
        w.write_str(" xmlns=\"\"")?;
    }
    for binding in declarations.iter().rev() {
        let uri = quote_attribute(binding.uri().unwrap_or_default());
        match binding.prefix() {
            Some(prefix) => write!(w, " xmlns:{}={}", prefix, uri)?,
            None => write!(w, " xmlns={}", uri)?,
        }
    }
    Ok(())
}

use std::fmt::{Display, Formatter};

use vector_map::VecMap;

use crate::error::Error;
use crate::group::Group;
use crate::namespace::NamespaceBinding;
use crate::serializer::XmlSerializer;
use crate::validate::{has_only_legal_chars, is_valid_name};

/// The type of an XML node.
///
/// The `NodeType` can be used if you are interested in the type of the node
/// without needing to match on it.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum NodeType {
    /// Processing instruction.
    ProcessingInstruction,
    /// Element; it has a name, attributes, a namespace scope and children.
    Element,
    /// Text.
    Text,
    /// CDATA section.
    CData,
    /// Entity reference.
    EntityRef,
}

/// An XML node.
///
/// Every value of this type is well-formed: the constructors of the
/// variants validate their input and fail rather than produce an invalid
/// node.
///
/// Its [`Display`] implementation renders the node as XML.
///
/// ```rust
/// use xmlfrag::{Element, Group, Node};
///
/// let greeting = Element::named("greeting")?
///     .with_attribute("lang", "en")?
///     .with_children(Group::new(vec![Node::text("hello & welcome")?]));
/// let node = Node::from(greeting);
/// assert_eq!(node.to_string(), r#"<greeting lang="en">hello &amp; welcome</greeting>"#);
/// # Ok::<(), xmlfrag::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Processing instruction, e.g. `<?target data?>`.
    ProcessingInstruction(ProcessingInstruction),
    /// Element, e.g. `<a href="x">...</a>`.
    Element(Element),
    /// Text.
    Text(Text),
    /// CDATA section, e.g. `<![CDATA[...]]>`.
    CData(CData),
    /// Entity reference, e.g. `&nbsp;`.
    EntityRef(EntityRef),
}

impl Node {
    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Result<Node, Error> {
        Ok(Node::Text(Text::new(content)?))
    }

    /// Create a CDATA node.
    pub fn cdata(content: impl Into<String>) -> Result<Node, Error> {
        Ok(Node::CData(CData::new(content)?))
    }

    /// Create an entity reference node.
    pub fn entity_ref(entity: impl Into<String>) -> Result<Node, Error> {
        Ok(Node::EntityRef(EntityRef::new(entity)?))
    }

    /// Create a processing instruction node.
    pub fn processing_instruction(target: impl Into<String>, data: impl Into<String>) -> Node {
        Node::ProcessingInstruction(ProcessingInstruction::new(target, data))
    }

    /// Returns the type of the node.
    pub fn node_type(&self) -> NodeType {
        match self {
            Node::ProcessingInstruction(_) => NodeType::ProcessingInstruction,
            Node::Element(_) => NodeType::Element,
            Node::Text(_) => NodeType::Text,
            Node::CData(_) => NodeType::CData,
            Node::EntityRef(_) => NodeType::EntityRef,
        }
    }

    /// The children of the node. Only elements have children; for any
    /// other node this is an empty group.
    pub fn children(&self) -> &Group {
        match self {
            Node::Element(element) => element.children(),
            _ => Group::empty_ref(),
        }
    }

    /// The element, if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// The concatenated text and CDATA content of this node and its
    /// descendants, in document order.
    ///
    /// ```rust
    /// use xmlfrag::parse;
    ///
    /// let doc = parse("<p>Hello <em>wide</em> <![CDATA[world]]></p>")?;
    /// assert_eq!(xmlfrag::Node::from(doc).text_content(), "Hello wide world");
    /// # Ok::<(), xmlfrag::Error>(())
    /// ```
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Node::Text(text) => result.push_str(text.get()),
                Node::CData(cdata) => result.push_str(cdata.get()),
                Node::Element(element) => stack.extend(element.children().iter().rev()),
                Node::ProcessingInstruction(_) | Node::EntityRef(_) => {}
            }
        }
        result
    }

    /// Return the canonical form of this node. See [`Group::canonicalize`].
    pub fn canonicalize(&self) -> Node {
        match self {
            Node::Element(element) => Node::Element(element.canonicalize()),
            _ => self.clone(),
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        XmlSerializer::default().write_node(f, self)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

impl From<CData> for Node {
    fn from(cdata: CData) -> Self {
        Node::CData(cdata)
    }
}

impl From<EntityRef> for Node {
    fn from(entity_ref: EntityRef) -> Self {
        Node::EntityRef(entity_ref)
    }
}

impl From<ProcessingInstruction> for Node {
    fn from(pi: ProcessingInstruction) -> Self {
        Node::ProcessingInstruction(pi)
    }
}

/// Attributes of an element, in insertion order. Keys are unique.
pub type Attributes = VecMap<String, String>;

/// XML element.
///
/// Example: `<foo/>` or `<x:foo bar="baz">...</x:foo>`.
///
/// Elements are immutable. The `with_*` methods return a new element that
/// shares its children and namespace scope with the receiver where they
/// are unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    prefix: Option<String>,
    name: String,
    attributes: Attributes,
    scope: NamespaceBinding,
    children: Group,
}

impl Element {
    /// Create an element.
    ///
    /// Fails with [`Error::InvalidElementName`] if `name` or `prefix` is
    /// not a valid XML name, with [`Error::InvalidAttributeName`] if an
    /// attribute key is not (or is a namespace declaration), and with
    /// [`Error::InvalidCharacterData`] if an attribute value contains an
    /// illegal character.
    ///
    /// `scope` is the namespace scope in effect for the element and is used
    /// for prefix lookups. The element prefix and any attribute prefix must
    /// be bound in it, else construction fails with
    /// [`Error::UnknownPrefix`]. The `xml` prefix is always bound.
    pub fn new(
        prefix: Option<&str>,
        name: &str,
        attributes: Attributes,
        scope: NamespaceBinding,
        children: Group,
    ) -> Result<Self, Error> {
        if !is_valid_name(name) {
            return Err(Error::InvalidElementName(name.to_string()));
        }
        if let Some(prefix) = prefix {
            if !is_valid_name(prefix) {
                return Err(Error::InvalidElementName(prefix.to_string()));
            }
        }
        for (key, value) in attributes.iter() {
            check_attribute(key, value)?;
        }
        check_bound(prefix, &attributes, &scope)?;
        Ok(Element {
            prefix: prefix.map(str::to_string),
            name: name.to_string(),
            attributes,
            scope,
            children,
        })
    }

    /// Create an unprefixed element with no attributes, an empty scope and
    /// no children.
    pub fn named(name: &str) -> Result<Self, Error> {
        Element::new(
            None,
            name,
            Attributes::new(),
            NamespaceBinding::Empty,
            Group::empty(),
        )
    }

    /// The namespace prefix of the element name, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The local name of the element.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The qualified name: `prefix:name`, or just `name` without a prefix.
    pub fn qname(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.name),
            None => self.name.clone(),
        }
    }

    /// The attributes of the element.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Get an attribute value by key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str())
    }

    /// The namespace scope in effect for the element.
    pub fn scope(&self) -> &NamespaceBinding {
        &self.scope
    }

    /// The children of the element.
    pub fn children(&self) -> &Group {
        &self.children
    }

    /// The binding of the element's own prefix, detached from the rest of
    /// the scope.
    ///
    /// An element without a prefix resolves the default namespace. Returns
    /// `None` if the prefix is not bound in scope.
    ///
    /// ```rust
    /// use xmlfrag::{parse, NamespaceBinding};
    ///
    /// let doc = parse(r#"<a xmlns:x="urn:x" xmlns="urn:default"><x:b/></a>"#)?;
    /// let b = doc.children()[0].as_element().unwrap();
    /// assert_eq!(
    ///     b.prefix_binding(),
    ///     Some(NamespaceBinding::prefixed("x", "urn:x", None)?)
    /// );
    /// # Ok::<(), xmlfrag::Error>(())
    /// ```
    pub fn prefix_binding(&self) -> Option<NamespaceBinding> {
        self.scope
            .find_prefix(self.prefix().unwrap_or(""))
            .map(NamespaceBinding::loose_parent)
    }

    /// The namespace URI of the element, if its prefix resolves.
    pub fn namespace_uri(&self) -> Option<&str> {
        self.scope
            .find_prefix(self.prefix().unwrap_or(""))
            .and_then(NamespaceBinding::uri)
    }

    /// Return a copy of this element with a different prefix.
    ///
    /// The prefix must be bound in the element's scope.
    pub fn with_prefix(&self, prefix: Option<&str>) -> Result<Element, Error> {
        if let Some(prefix) = prefix {
            if !is_valid_name(prefix) {
                return Err(Error::InvalidElementName(prefix.to_string()));
            }
            check_prefix(prefix, &self.scope)?;
        }
        Ok(Element {
            prefix: prefix.map(str::to_string),
            ..self.clone()
        })
    }

    /// Return a copy of this element with an attribute set, replacing any
    /// existing value for `key` in place.
    pub fn with_attribute(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Element, Error> {
        let key = key.into();
        let value = value.into();
        check_attribute(&key, &value)?;
        if let Some((prefix, _)) = key.split_once(':') {
            check_prefix(prefix, &self.scope)?;
        }
        let mut attributes = self.attributes.clone();
        attributes.insert(key, value);
        Ok(Element {
            attributes,
            ..self.clone()
        })
    }

    /// Return a copy of this element without the attribute `key`.
    pub fn without_attribute(&self, key: &str) -> Element {
        let mut attributes = self.attributes.clone();
        attributes.retain(|k, _| k != key);
        Element {
            attributes,
            ..self.clone()
        }
    }

    /// Return a copy of this element with a different namespace scope.
    ///
    /// Fails with [`Error::UnknownPrefix`] if the new scope does not bind
    /// the element prefix or an attribute prefix.
    pub fn with_scope(&self, scope: NamespaceBinding) -> Result<Element, Error> {
        check_bound(self.prefix(), &self.attributes, &scope)?;
        Ok(Element {
            scope,
            ..self.clone()
        })
    }

    /// Return a copy of this element with different children.
    pub fn with_children(&self, children: Group) -> Element {
        Element {
            children,
            ..self.clone()
        }
    }

    /// Return a copy of this element with its children in canonical form.
    ///
    /// Namespace and attribute data are unchanged.
    pub fn canonicalize(&self) -> Element {
        self.with_children(self.children.canonicalize())
    }

    /// Everything but the children is equal.
    pub(crate) fn same_head(&self, other: &Element) -> bool {
        self.prefix == other.prefix
            && self.name == other.name
            && self.attributes == other.attributes
            && self.scope == other.scope
    }

    pub(crate) fn take_children(&mut self) -> Group {
        std::mem::replace(&mut self.children, Group::empty_ref().clone())
    }
}

fn check_attribute(key: &str, value: &str) -> Result<(), Error> {
    // namespace declarations live in the scope
    if !is_valid_name(key) || key == "xmlns" || key.starts_with("xmlns:") {
        return Err(Error::InvalidAttributeName(key.to_string()));
    }
    if !has_only_legal_chars(value) {
        return Err(Error::InvalidCharacterData(value.to_string()));
    }
    Ok(())
}

fn check_prefix(prefix: &str, scope: &NamespaceBinding) -> Result<(), Error> {
    if prefix != "xml" && scope.find_prefix(prefix).is_none() {
        return Err(Error::UnknownPrefix(prefix.to_string()));
    }
    Ok(())
}

fn check_bound(
    prefix: Option<&str>,
    attributes: &Attributes,
    scope: &NamespaceBinding,
) -> Result<(), Error> {
    let attribute_prefixes = attributes
        .iter()
        .filter_map(|(key, _)| key.split_once(':').map(|(prefix, _)| prefix));
    for prefix in prefix.into_iter().chain(attribute_prefixes) {
        check_prefix(prefix, scope)?;
    }
    Ok(())
}

/// XML text.
///
/// Example: `Bar` in `<foo>Bar</foo>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Text {
    text: String,
}

impl Text {
    /// Create text. Fails with [`Error::InvalidCharacterData`] if it
    /// contains an illegal character.
    pub fn new(text: impl Into<String>) -> Result<Self, Error> {
        let text = text.into();
        if !has_only_legal_chars(&text) {
            return Err(Error::InvalidCharacterData(text));
        }
        Ok(Text { text })
    }

    /// Get the text.
    pub fn get(&self) -> &str {
        &self.text
    }

    // legal text concatenated with legal text stays legal
    pub(crate) fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }
}

/// XML CDATA section.
///
/// Example: `<![CDATA[a < b]]>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CData {
    text: String,
}

impl CData {
    /// Create a CDATA section.
    ///
    /// Fails with [`Error::InvalidCharacterData`] if the content contains an
    /// illegal character, and with [`Error::InvalidCDATATerminator`] if it
    /// contains `]]>`.
    pub fn new(text: impl Into<String>) -> Result<Self, Error> {
        let text = text.into();
        if !has_only_legal_chars(&text) {
            return Err(Error::InvalidCharacterData(text));
        }
        if text.contains("]]>") {
            return Err(Error::InvalidCDATATerminator(text));
        }
        Ok(CData { text })
    }

    /// Get the content.
    pub fn get(&self) -> &str {
        &self.text
    }

    /// Append `text` unless the result would contain `]]>`. Returns whether
    /// it was appended.
    pub(crate) fn try_push_str(&mut self, text: &str) -> bool {
        let mut joined = String::with_capacity(self.text.len() + text.len());
        joined.push_str(&self.text);
        joined.push_str(text);
        if joined.contains("]]>") {
            return false;
        }
        self.text = joined;
        true
    }
}

/// XML entity reference.
///
/// Example: `&nbsp;`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef {
    entity: String,
}

impl EntityRef {
    /// Create an entity reference to `entity`, without the surrounding `&`
    /// and `;`.
    ///
    /// Fails with [`Error::InvalidCharacterData`] if it contains an illegal
    /// character.
    pub fn new(entity: impl Into<String>) -> Result<Self, Error> {
        let entity = entity.into();
        if !has_only_legal_chars(&entity) {
            return Err(Error::InvalidCharacterData(entity));
        }
        Ok(EntityRef { entity })
    }

    /// Get the entity name.
    pub fn get(&self) -> &str {
        &self.entity
    }
}

/// XML processing instruction.
///
/// Example: `<?xml-stylesheet href="style.css"?>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessingInstruction {
    target: String,
    data: String,
}

impl ProcessingInstruction {
    /// Create a processing instruction.
    pub fn new(target: impl Into<String>, data: impl Into<String>) -> Self {
        ProcessingInstruction {
            target: target.into(),
            data: data.into(),
        }
    }

    /// Get processing instruction target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Get processing instruction data.
    pub fn data(&self) -> &str {
        &self.data
    }
}

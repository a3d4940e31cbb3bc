//! Building nodes from XML text.
//!
//! The tokenizer is [`xmlparser`]; this module assembles its tokens into
//! [`Node`] values, building a [`NamespaceBinding`] chain per element as
//! namespace declarations are encountered.
use xmlparser::{ElementEnd, StrSpan, Token, Tokenizer};

use crate::encoding::decode;
use crate::entity::{parse_attribute_entities, parse_text_entities, TextPart};
use crate::error::Error;
use crate::group::Group;
use crate::namespace::NamespaceBinding;
use crate::node::{Attributes, Element, Node};

/// An element whose start tag has been read but which is not finished yet.
struct Frame {
    prefix: Option<String>,
    name: String,
    attributes: Attributes,
    // prefixes used by attribute names; checked once the start tag is done
    attribute_prefixes: Vec<String>,
    // `xmlns` and `xmlns:p` keys seen in the start tag
    declared: Vec<String>,
    scope: NamespaceBinding,
    children: Vec<Node>,
}

impl Frame {
    fn qname(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.name),
            None => self.name.clone(),
        }
    }
}

struct FragmentBuilder {
    stack: Vec<Frame>,
    top: Vec<Node>,
}

impl FragmentBuilder {
    fn new() -> Self {
        FragmentBuilder {
            stack: Vec::new(),
            top: Vec::new(),
        }
    }

    fn scope(&self) -> NamespaceBinding {
        self.stack
            .last()
            .map(|frame| frame.scope.clone())
            .unwrap_or_default()
    }

    fn add(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(frame) => frame.children.push(node),
            None => self.top.push(node),
        }
    }

    fn element_start(&mut self, prefix: StrSpan, local: StrSpan) {
        let prefix = non_empty(prefix);
        tracing::trace!(prefix = ?prefix, name = local.as_str(), "element start");
        let scope = self.scope();
        self.stack.push(Frame {
            prefix,
            name: local.as_str().to_string(),
            attributes: Attributes::new(),
            attribute_prefixes: Vec::new(),
            declared: Vec::new(),
            scope,
            children: Vec::new(),
        });
    }

    fn attribute(&mut self, prefix: StrSpan, local: StrSpan, value: StrSpan) -> Result<(), Error> {
        let value = parse_attribute_entities(value.as_str())?;
        // the tokenizer only produces attributes inside a start tag
        let Some(frame) = self.stack.last_mut() else {
            return Ok(());
        };
        let is_declaration = match prefix.as_str() {
            "" => local.as_str() == "xmlns",
            other => other == "xmlns",
        };
        if is_declaration {
            let key = qualified(prefix, local);
            if frame.declared.contains(&key) {
                return Err(Error::DuplicateAttribute(key));
            }
            frame.declared.push(key);
        }
        match (prefix.as_str(), local.as_str()) {
            ("xmlns", prefix) => {
                if value.is_empty() {
                    return Err(Error::EmptyNamespaceUri(prefix.to_string()));
                }
                frame.scope = frame.scope.append_prefixed(prefix, &*value)?;
            }
            ("", "xmlns") => {
                if !value.is_empty() {
                    frame.scope = frame.scope.append(&*value);
                } else if frame.scope.find_prefix("").is_some() {
                    frame.scope = without_default(&frame.scope)?;
                }
            }
            (prefix, local) => {
                let key = if prefix.is_empty() {
                    local.to_string()
                } else {
                    frame.attribute_prefixes.push(prefix.to_string());
                    format!("{}:{}", prefix, local)
                };
                if frame.attributes.iter().any(|(k, _)| *k == key) {
                    return Err(Error::DuplicateAttribute(key));
                }
                frame.attributes.insert(key, value.into_owned());
            }
        }
        Ok(())
    }

    fn start_tag_end(&mut self) -> Result<(), Error> {
        let Some(frame) = self.stack.last() else {
            return Ok(());
        };
        let prefixes = frame.prefix.iter().chain(frame.attribute_prefixes.iter());
        for prefix in prefixes {
            if prefix != "xml" && frame.scope.find_prefix(prefix).is_none() {
                return Err(Error::UnknownPrefix(prefix.clone()));
            }
        }
        Ok(())
    }

    fn element_end(&mut self) -> Result<(), Error> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| Error::UnmatchedCloseTag(String::new()))?;
        tracing::trace!(name = %frame.qname(), "element end");
        let element = Element::new(
            frame.prefix.as_deref(),
            &frame.name,
            frame.attributes,
            frame.scope,
            Group::new(frame.children),
        )?;
        self.add(element.into());
        Ok(())
    }

    fn close(&mut self, prefix: StrSpan, local: StrSpan) -> Result<(), Error> {
        let qname = qualified(prefix, local);
        let matches = self
            .stack
            .last()
            .map_or(false, |frame| frame.qname() == qname);
        if !matches {
            return Err(Error::UnmatchedCloseTag(qname));
        }
        self.element_end()
    }

    fn text(&mut self, text: StrSpan) -> Result<(), Error> {
        for part in parse_text_entities(text.as_str())? {
            let node = match part {
                TextPart::Text(text) => Node::text(text)?,
                TextPart::EntityRef(entity) => Node::entity_ref(entity)?,
            };
            self.add(node);
        }
        Ok(())
    }

    fn build(mut self, tokenizer: Tokenizer<'_>) -> Result<Vec<Node>, Error> {
        for token in tokenizer {
            match token? {
                Token::ElementStart { prefix, local, .. } => self.element_start(prefix, local),
                Token::Attribute {
                    prefix,
                    local,
                    value,
                    ..
                } => self.attribute(prefix, local, value)?,
                Token::ElementEnd { end, .. } => match end {
                    ElementEnd::Open => self.start_tag_end()?,
                    ElementEnd::Empty => {
                        self.start_tag_end()?;
                        self.element_end()?;
                    }
                    ElementEnd::Close(prefix, local) => self.close(prefix, local)?,
                },
                Token::Text { text } => self.text(text)?,
                Token::Cdata { text, .. } => self.add(Node::cdata(text.as_str())?),
                Token::ProcessingInstruction {
                    target, content, ..
                } => self.add(Node::processing_instruction(
                    target.as_str(),
                    content.map(|c| c.as_str()).unwrap_or_default(),
                )),
                Token::DtdStart { .. } | Token::EmptyDtd { .. } => {
                    return Err(Error::DtdUnsupported)
                }
                // comments are dropped; the declaration carries nothing we keep
                _ => {}
            }
        }
        if let Some(frame) = self.stack.last() {
            return Err(Error::UnclosedElement(frame.qname()));
        }
        Ok(self.top)
    }
}

fn qualified(prefix: StrSpan, local: StrSpan) -> String {
    if prefix.as_str().is_empty() {
        local.as_str().to_string()
    } else {
        format!("{}:{}", prefix.as_str(), local.as_str())
    }
}

fn non_empty(span: StrSpan) -> Option<String> {
    if span.as_str().is_empty() {
        None
    } else {
        Some(span.as_str().to_string())
    }
}

/// Rebuild `scope` without any default namespace binding, for `xmlns=""`.
fn without_default(scope: &NamespaceBinding) -> Result<NamespaceBinding, Error> {
    let mut result = NamespaceBinding::Empty;
    for binding in scope.to_list().into_iter().rev() {
        if let (Some(prefix), Some(uri)) = (binding.prefix(), binding.uri()) {
            result = result.append_prefixed(prefix, uri)?;
        }
    }
    Ok(result)
}

fn logged<T>(result: Result<T, Error>) -> Result<T, Error> {
    if let Err(e) = &result {
        tracing::debug!(error = %e, "parse failed");
    }
    result
}

/// Parse a document and return its root element.
///
/// Processing instructions and whitespace outside the root element are
/// dropped, as are comments anywhere. Document type declarations are
/// rejected.
///
/// ```rust
/// let root = xmlfrag::parse(r#"<?xml version="1.0"?><doc a="1">text</doc>"#)?;
/// assert_eq!(root.name(), "doc");
/// assert_eq!(root.attribute("a"), Some("1"));
/// # Ok::<(), xmlfrag::Error>(())
/// ```
pub fn parse(xml: &str) -> Result<Element, Error> {
    logged(FragmentBuilder::new().build(Tokenizer::from(xml)).and_then(root_element))
}

/// Parse a fragment: any sequence of elements, text, CDATA sections,
/// entity references and processing instructions.
///
/// Unknown entities in text become entity reference nodes.
///
/// ```rust
/// use xmlfrag::{parse_fragment, Node};
///
/// let group = parse_fragment("a&nbsp;<b/>")?;
/// assert_eq!(group.len(), 3);
/// assert_eq!(group[1], Node::entity_ref("nbsp")?);
/// # Ok::<(), xmlfrag::Error>(())
/// ```
pub fn parse_fragment(xml: &str) -> Result<Group, Error> {
    let tokenizer = Tokenizer::from_fragment(xml, 0..xml.len());
    logged(FragmentBuilder::new().build(tokenizer).map(Group::new))
}

/// Parse a document from bytes, detecting its encoding.
pub fn parse_bytes(data: &[u8]) -> Result<Element, Error> {
    let xml = logged(decode(data))?;
    parse(&xml)
}

fn root_element(nodes: Vec<Node>) -> Result<Element, Error> {
    let mut elements = nodes.into_iter().filter_map(|node| match node {
        Node::Element(element) => Some(element),
        _ => None,
    });
    match (elements.next(), elements.next()) {
        (Some(root), None) => Ok(root),
        _ => Err(Error::NoRootElement),
    }
}

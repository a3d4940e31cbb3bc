//! Proptest support
//!
//! Proptests allow you to test for *properties* of your code that must hold
//! for arbitrary data. These strategies generate arbitrary, always valid,
//! nodes.
//!
//! This can be enabled by adding the `proptest` feature to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! xmlfrag = { version = "0.1", features = ["proptest"] }
//! ```
//!
//! See the [`proptest`](https://docs.rs/proptest/latest/proptest/)
//! documentation for more information.
//!
//! Generated values survive a trip through the serializer and the parser:
//! text avoids carriage returns, processing instruction data has no
//! surrounding whitespace and elements only use the prefixes their scope
//! binds.

use proptest::prelude::*;

use crate::group::Group;
use crate::namespace::NamespaceBinding;
use crate::node::{Attributes, Element, Node};

const NAMESPACES: &[&str] = &["http://example.com/x", "http://example.com/y", "urn:z"];
const PREFIXES: &[&str] = &["", "x", "y"];
const ELEMENT_NAMES: &[&str] = &["a", "b", "c", "d", "e"];
const ATTRIBUTE_NAMES: &[&str] = &["q", "r", "s"];
const PI_NAMES: &[&str] = &["pi1", "pi2", "pi3"];
const ENTITY_NAMES: &[&str] = &["nbsp", "copy", "mdash"];
const XML_STRING: &str = "[\u{0009}\u{000a}\u{0020}-\u{D7FF}\u{E000}-\u{FFFD}]{1,20}";
const XML_STRING_WITHOUT_WHITESPACE: &str = "[\u{0020}-\u{D7FF}\u{E000}-\u{FFFD}]{0,20}";

/// Non-empty text with only legal characters.
pub fn arb_text() -> impl Strategy<Value = String> {
    XML_STRING
}

/// A valid XML name.
pub fn arb_name() -> impl Strategy<Value = String> {
    "[a-zA-Z_:][a-zA-Z0-9_:.\u{B7}-]{0,10}"
}

fn arb_cdata() -> impl Strategy<Value = String> {
    XML_STRING.prop_filter("cdata terminator", |s| !s.contains("]]>"))
}

fn arb_pi_data() -> impl Strategy<Value = String> {
    "([a-z0-9=\"]([a-z0-9= \"]{0,8}[a-z0-9=\"])?)?"
}

fn arb_leaf() -> impl Strategy<Value = Node> {
    prop_oneof![
        arb_text().prop_map(|s| Node::text(s).unwrap()),
        arb_cdata().prop_map(|s| Node::cdata(s).unwrap()),
        prop::sample::select(ENTITY_NAMES).prop_map(|s| Node::entity_ref(s).unwrap()),
        (prop::sample::select(PI_NAMES), arb_pi_data())
            .prop_map(|(target, data)| Node::processing_instruction(target, data)),
    ]
}

fn arb_attributes() -> impl Strategy<Value = Vec<(&'static str, String)>> {
    prop::collection::vec(
        (
            prop::sample::select(ATTRIBUTE_NAMES),
            XML_STRING_WITHOUT_WHITESPACE,
        ),
        0..4,
    )
}

fn arb_declarations() -> impl Strategy<Value = Vec<(&'static str, &'static str)>> {
    prop::collection::vec(
        (
            prop::sample::select(PREFIXES),
            prop::sample::select(NAMESPACES),
        ),
        0..3,
    )
}

/// The shape of a generated tree, before scopes are resolved top-down.
#[derive(Debug, Clone)]
enum Shape {
    Leaf(Node),
    Element(ElementShape),
}

#[derive(Debug, Clone)]
struct ElementShape {
    name: &'static str,
    prefix: &'static str,
    attributes: Vec<(&'static str, String)>,
    declarations: Vec<(&'static str, &'static str)>,
    children: Vec<Shape>,
}

fn extend_scope(scope: &NamespaceBinding, declarations: &[(&str, &str)]) -> NamespaceBinding {
    let mut scope = scope.clone();
    for (prefix, uri) in declarations {
        scope = if prefix.is_empty() {
            scope.append(*uri)
        } else {
            scope.append_prefixed(*prefix, *uri).unwrap()
        };
    }
    scope
}

/// A tree of nodes, elements declaring namespaces along the way.
pub fn arb_node() -> impl Strategy<Value = Node> {
    arb_element().prop_map(Node::from)
}

/// An element with arbitrary attributes, scope and content.
pub fn arb_element() -> impl Strategy<Value = Element> {
    let content = arb_leaf().prop_map(Shape::Leaf).prop_recursive(
        6,  // levels deep
        64, // maximum size of 64 nodes
        6,  // up to 6 items per collection
        |inner| arb_element_shape(prop::collection::vec(inner, 0..6)).prop_map(Shape::Element),
    );
    arb_element_shape(prop::collection::vec(content, 0..6))
        .prop_map(|shape| build_element(&shape, &NamespaceBinding::Empty))
}

fn arb_element_shape(
    children: impl Strategy<Value = Vec<Shape>>,
) -> impl Strategy<Value = ElementShape> {
    (
        prop::sample::select(ELEMENT_NAMES),
        prop::sample::select(PREFIXES),
        arb_attributes(),
        arb_declarations(),
        children,
    )
        .prop_map(
            |(name, prefix, attributes, declarations, children)| ElementShape {
                name,
                prefix,
                attributes,
                declarations,
                children,
            },
        )
}

// a prefix the scope does not bind is dropped
fn build_element(shape: &ElementShape, enclosing: &NamespaceBinding) -> Element {
    let scope = extend_scope(enclosing, &shape.declarations);
    let prefix = Some(shape.prefix).filter(|p| !p.is_empty() && scope.find_prefix(p).is_some());
    let mut attributes = Attributes::new();
    for (key, value) in &shape.attributes {
        attributes.insert(key.to_string(), value.clone());
    }
    let children: Group = shape
        .children
        .iter()
        .map(|child| match child {
            Shape::Leaf(node) => node.clone(),
            Shape::Element(element) => build_element(element, &scope).into(),
        })
        .collect();
    Element::new(prefix, shape.name, attributes, scope, children).unwrap()
}

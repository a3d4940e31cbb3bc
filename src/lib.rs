#![forbid(unsafe_code)]

//! An immutable XML node model.
//!
//! Nodes come in five kinds: elements, text, CDATA sections, processing
//! instructions and entity references. Each kind validates its input when
//! it is constructed, so every [`Node`] you hold is well-formed XML.
//!
//! Elements carry a [`NamespaceBinding`]: a persistent chain of prefix to
//! URI bindings that is shared between an element and its descendants.
//!
//! ```rust
//! use xmlfrag::{Element, Group, NamespaceBinding, Node};
//!
//! let scope = NamespaceBinding::Empty.append_prefixed("svg", "http://www.w3.org/2000/svg")?;
//! let rect = Element::named("rect")?
//!     .with_scope(scope.clone())?
//!     .with_prefix(Some("svg"))?
//!     .with_attribute("width", "10")?;
//! let svg = Element::named("svg")?
//!     .with_scope(scope)?
//!     .with_prefix(Some("svg"))?
//!     .with_children(Group::new(vec![rect.into()]));
//!
//! assert_eq!(
//!     Node::from(svg).to_string(),
//!     r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg"><svg:rect width="10"/></svg:svg>"#
//! );
//! # Ok::<(), xmlfrag::Error>(())
//! ```

mod encoding;
pub mod entity;
mod error;
mod group;
mod namespace;
mod node;
mod parse;
#[cfg(feature = "proptest")]
pub mod proptest;
pub mod serializer;
pub mod validate;

pub use error::Error;
pub use group::Group;
pub use namespace::{Bindings, NamespaceBinding, Prefixed, Unprefixed};
pub use node::{Attributes, CData, Element, EntityRef, Node, NodeType, ProcessingInstruction, Text};
pub use parse::{parse, parse_bytes, parse_fragment};
pub use serializer::XmlSerializer;

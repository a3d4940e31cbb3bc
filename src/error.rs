use std::fmt::{Display, Formatter};

/// Errors raised while constructing, parsing or serializing nodes.
///
/// Construction errors are raised before any value exists: a [`Node`](crate::Node)
/// or [`NamespaceBinding`](crate::NamespaceBinding) you hold is always
/// well-formed.
#[derive(Debug)]
pub enum Error {
    /// An element name, element prefix or namespace prefix is not a valid
    /// XML name.
    InvalidElementName(String),
    /// An attribute name is not a valid XML name.
    InvalidAttributeName(String),
    /// Character data contains a character outside the legal XML ranges.
    InvalidCharacterData(String),
    /// CDATA content contains the `]]>` terminator.
    InvalidCDATATerminator(String),
    /// An entity is missing its closing `;`.
    UnclosedEntity(String),
    /// An entity cannot be resolved in this position.
    InvalidEntity(String),
    /// A prefix is used that is not bound in scope.
    UnknownPrefix(String),
    /// A prefix is bound to the empty namespace URI.
    EmptyNamespaceUri(String),
    /// A close tag does not match the element it closes.
    UnmatchedCloseTag(String),
    /// An element is not closed at the end of input.
    UnclosedElement(String),
    /// An attribute occurs twice on the same element.
    DuplicateAttribute(String),
    /// Document type declarations are not supported.
    DtdUnsupported,
    /// A document has no root element, or more than one.
    NoRootElement,
    /// The encoding of byte input could not be determined.
    UnsupportedEncoding,
    /// Tokenizer error.
    Parser(xmlparser::Error),
    /// Error writing to a sink.
    Io(std::io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidElementName(name) => write!(f, "invalid element name: {:?}", name),
            Error::InvalidAttributeName(name) => write!(f, "invalid attribute name: {:?}", name),
            Error::InvalidCharacterData(data) => {
                write!(f, "illegal character in character data: {:?}", data)
            }
            Error::InvalidCDATATerminator(data) => {
                write!(f, "CDATA content contains ']]>': {:?}", data)
            }
            Error::UnclosedEntity(entity) => write!(f, "unclosed entity: &{}", entity),
            Error::InvalidEntity(entity) => write!(f, "invalid entity: &{};", entity),
            Error::UnknownPrefix(prefix) => write!(f, "unknown prefix: {}", prefix),
            Error::EmptyNamespaceUri(prefix) => {
                write!(f, "prefix {:?} bound to the empty namespace", prefix)
            }
            Error::UnmatchedCloseTag(name) => write!(f, "unmatched close tag: </{}>", name),
            Error::UnclosedElement(name) => write!(f, "unclosed element: <{}>", name),
            Error::DuplicateAttribute(name) => write!(f, "duplicate attribute: {}", name),
            Error::DtdUnsupported => write!(f, "document type declarations are not supported"),
            Error::NoRootElement => write!(f, "document must have exactly one root element"),
            Error::UnsupportedEncoding => write!(f, "unsupported encoding"),
            Error::Parser(e) => write!(f, "parse error: {}", e),
            Error::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parser(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<xmlparser::Error> for Error {
    #[inline]
    fn from(e: xmlparser::Error) -> Self {
        Error::Parser(e)
    }
}

impl From<std::io::Error> for Error {
    #[inline]
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

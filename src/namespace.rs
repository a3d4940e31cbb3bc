//! Namespace scopes as a persistent chain of bindings.
//!
//! A [`NamespaceBinding`] binds a prefix (or the default namespace) to a
//! URI and points at the binding of the enclosing scope. Chains are never
//! mutated: [`NamespaceBinding::append`] and
//! [`NamespaceBinding::append_prefixed`] build a new head that shares the
//! existing chain, so extending a scope is O(1) and sibling elements can
//! share the same ancestry.
//!
//! ```rust
//! use xmlfrag::NamespaceBinding;
//!
//! let scope = NamespaceBinding::Empty
//!     .append_prefixed("a", "urn:a")?
//!     .append_prefixed("b", "urn:b")?;
//!
//! assert_eq!(scope.find_prefix("a").and_then(|b| b.uri()), Some("urn:a"));
//! assert!(scope.find_prefix("c").is_none());
//! # Ok::<(), xmlfrag::Error>(())
//! ```
use std::sync::Arc;

use crate::error::Error;
use crate::validate::is_valid_name;

/// A link in a namespace scope chain.
#[derive(Debug, Clone, Default)]
pub enum NamespaceBinding {
    /// The outermost scope. Binds nothing.
    #[default]
    Empty,
    /// Binds the default namespace.
    Unprefixed(Unprefixed),
    /// Binds a prefix.
    Prefixed(Prefixed),
}

/// Binding of the default namespace to a URI.
#[derive(Debug, Clone)]
pub struct Unprefixed {
    uri: Arc<str>,
    parent: Option<Arc<NamespaceBinding>>,
}

/// Binding of a prefix to a URI.
#[derive(Debug, Clone)]
pub struct Prefixed {
    prefix: Arc<str>,
    uri: Arc<str>,
    parent: Option<Arc<NamespaceBinding>>,
}

impl Unprefixed {
    /// The bound namespace URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl Prefixed {
    /// The bound prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The bound namespace URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl NamespaceBinding {
    /// Create a binding of the default namespace.
    pub fn unprefixed(uri: impl Into<Arc<str>>, parent: Option<NamespaceBinding>) -> Self {
        NamespaceBinding::Unprefixed(Unprefixed {
            uri: uri.into(),
            parent: parent.map(Arc::new),
        })
    }

    /// Create a binding of `prefix`.
    ///
    /// Fails with [`Error::InvalidElementName`] if `prefix` is not a valid
    /// XML name.
    pub fn prefixed(
        prefix: impl Into<Arc<str>>,
        uri: impl Into<Arc<str>>,
        parent: Option<NamespaceBinding>,
    ) -> Result<Self, Error> {
        let prefix = prefix.into();
        if !is_valid_name(&prefix) {
            return Err(Error::InvalidElementName(prefix.to_string()));
        }
        Ok(NamespaceBinding::Prefixed(Prefixed {
            prefix,
            uri: uri.into(),
            parent: parent.map(Arc::new),
        }))
    }

    /// Bind the default namespace in a new scope enclosed by this one.
    pub fn append(&self, uri: impl Into<Arc<str>>) -> NamespaceBinding {
        NamespaceBinding::Unprefixed(Unprefixed {
            uri: uri.into(),
            parent: Some(Arc::new(self.clone())),
        })
    }

    /// Bind `prefix` in a new scope enclosed by this one.
    ///
    /// Fails with [`Error::InvalidElementName`] if `prefix` is not a valid
    /// XML name.
    pub fn append_prefixed(
        &self,
        prefix: impl Into<Arc<str>>,
        uri: impl Into<Arc<str>>,
    ) -> Result<NamespaceBinding, Error> {
        NamespaceBinding::prefixed(prefix, uri, Some(self.clone()))
    }

    /// Returns `true` for the [`NamespaceBinding::Empty`] terminal.
    pub fn is_empty(&self) -> bool {
        matches!(self, NamespaceBinding::Empty)
    }

    /// The bound URI; `None` for `Empty`.
    pub fn uri(&self) -> Option<&str> {
        match self {
            NamespaceBinding::Empty => None,
            NamespaceBinding::Unprefixed(binding) => Some(binding.uri()),
            NamespaceBinding::Prefixed(binding) => Some(binding.uri()),
        }
    }

    /// The bound prefix; `None` for `Empty` and for the default namespace.
    pub fn prefix(&self) -> Option<&str> {
        match self {
            NamespaceBinding::Prefixed(binding) => Some(binding.prefix()),
            _ => None,
        }
    }

    /// The binding of the enclosing scope.
    pub fn parent(&self) -> Option<&NamespaceBinding> {
        match self {
            NamespaceBinding::Empty => None,
            NamespaceBinding::Unprefixed(binding) => binding.parent.as_deref(),
            NamespaceBinding::Prefixed(binding) => binding.parent.as_deref(),
        }
    }

    /// Iterate over the bindings from this one outward to the root.
    ///
    /// The `Empty` terminal is not included.
    pub fn iter(&self) -> Bindings<'_> {
        Bindings { next: Some(self) }
    }

    /// Find the innermost binding of `prefix`.
    ///
    /// The empty string looks up the default namespace.
    pub fn find_prefix(&self, prefix: &str) -> Option<&NamespaceBinding> {
        self.iter().find(|binding| match binding {
            NamespaceBinding::Empty => false,
            NamespaceBinding::Unprefixed(_) => prefix.is_empty(),
            NamespaceBinding::Prefixed(binding) => binding.prefix() == prefix,
        })
    }

    /// Find the innermost binding of namespace `uri`, prefixed or not.
    ///
    /// The binding found may be shadowed by a closer binding of the same
    /// prefix.
    pub fn find_namespace(&self, uri: &str) -> Option<&NamespaceBinding> {
        self.iter().find(|binding| binding.uri() == Some(uri))
    }

    /// A copy of this binding detached from its enclosing scope.
    ///
    /// ```rust
    /// use xmlfrag::NamespaceBinding;
    ///
    /// let scope = NamespaceBinding::Empty.append("urn:x").append_prefixed("a", "urn:a")?;
    /// let loose = scope.loose_parent();
    /// assert_eq!(loose, NamespaceBinding::prefixed("a", "urn:a", None)?);
    /// assert!(loose.parent().is_none());
    /// # Ok::<(), xmlfrag::Error>(())
    /// ```
    pub fn loose_parent(&self) -> NamespaceBinding {
        match self {
            NamespaceBinding::Empty => NamespaceBinding::Empty,
            NamespaceBinding::Unprefixed(binding) => NamespaceBinding::Unprefixed(Unprefixed {
                uri: binding.uri.clone(),
                parent: None,
            }),
            NamespaceBinding::Prefixed(binding) => NamespaceBinding::Prefixed(Prefixed {
                prefix: binding.prefix.clone(),
                uri: binding.uri.clone(),
                parent: None,
            }),
        }
    }

    /// The bindings from this one outward to the root, this one first.
    pub fn to_list(&self) -> Vec<&NamespaceBinding> {
        self.iter().collect()
    }

    fn same_link(&self, other: &NamespaceBinding) -> bool {
        match (self, other) {
            (NamespaceBinding::Empty, NamespaceBinding::Empty) => true,
            (NamespaceBinding::Unprefixed(a), NamespaceBinding::Unprefixed(b)) => a.uri == b.uri,
            (NamespaceBinding::Prefixed(a), NamespaceBinding::Prefixed(b)) => {
                a.prefix == b.prefix && a.uri == b.uri
            }
            _ => false,
        }
    }

    fn take_parent(&mut self) -> Option<Arc<NamespaceBinding>> {
        match self {
            NamespaceBinding::Empty => None,
            NamespaceBinding::Unprefixed(binding) => binding.parent.take(),
            NamespaceBinding::Prefixed(binding) => binding.parent.take(),
        }
    }
}

impl PartialEq for NamespaceBinding {
    fn eq(&self, other: &Self) -> bool {
        let mut a = Some(self);
        let mut b = Some(other);
        loop {
            match (a, b) {
                (None, None) => return true,
                (Some(x), Some(y)) => {
                    if std::ptr::eq(x, y) {
                        return true;
                    }
                    if !x.same_link(y) {
                        return false;
                    }
                    a = x.parent();
                    b = y.parent();
                }
                _ => return false,
            }
        }
    }
}

impl Eq for NamespaceBinding {}

// Unlinks uniquely owned ancestors one by one so dropping a deep chain
// does not recurse.
impl Drop for NamespaceBinding {
    fn drop(&mut self) {
        let mut next = self.take_parent();
        while let Some(parent) = next {
            next = match Arc::try_unwrap(parent) {
                Ok(mut binding) => binding.take_parent(),
                Err(_) => None,
            };
        }
    }
}

/// Iterator over a scope chain, innermost binding first.
///
/// Created by [`NamespaceBinding::iter`].
#[derive(Debug, Clone)]
pub struct Bindings<'a> {
    next: Option<&'a NamespaceBinding>,
}

impl<'a> Iterator for Bindings<'a> {
    type Item = &'a NamespaceBinding;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        if current.is_empty() {
            return None;
        }
        self.next = current.parent();
        Some(current)
    }
}

impl<'a> IntoIterator for &'a NamespaceBinding {
    type Item = &'a NamespaceBinding;
    type IntoIter = Bindings<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

use std::ops::Deref;
use std::sync::{Arc, OnceLock};

use crate::node::{Element, Node};

/// An immutable, ordered sequence of nodes.
///
/// A group is cheap to clone: clones share the same underlying storage.
/// Functional updates such as [`Group::appended`] build a new group and
/// leave the receiver untouched.
///
/// A group dereferences to a slice, so the usual slice API (`len`, `iter`,
/// `get`, indexing) is available.
///
/// Comparing, canonicalizing and dropping a group walk the tree with an
/// explicit stack, so arbitrarily deep trees are fine.
#[derive(Debug, Clone)]
pub struct Group(Arc<[Node]>);

// a group whose children are still being canonicalized
struct Pending<'a> {
    element: Option<&'a Element>,
    nodes: std::slice::Iter<'a, Node>,
    merged: Vec<Node>,
}

impl<'a> Pending<'a> {
    fn new(element: Option<&'a Element>, group: &'a Group) -> Self {
        Pending {
            element,
            nodes: group.iter(),
            merged: Vec::with_capacity(group.len()),
        }
    }
}

fn push_merged(nodes: &mut Vec<Node>, node: Node) {
    let merged = match (nodes.last_mut(), &node) {
        (Some(Node::Text(last)), Node::Text(text)) => {
            last.push_str(text.get());
            true
        }
        (Some(Node::CData(last)), Node::CData(cdata)) => last.try_push_str(cdata.get()),
        _ => false,
    };
    if !merged {
        nodes.push(node);
    }
}

impl Group {
    /// Create a group from nodes.
    pub fn new(nodes: Vec<Node>) -> Self {
        Group(nodes.into())
    }

    /// Create an empty group.
    pub fn empty() -> Self {
        Group::new(Vec::new())
    }

    /// A shared empty group, used as the children of leaf nodes.
    pub(crate) fn empty_ref() -> &'static Group {
        static EMPTY: OnceLock<Group> = OnceLock::new();
        EMPTY.get_or_init(Group::empty)
    }

    /// Return a new group with `node` added at the end.
    pub fn appended(&self, node: Node) -> Group {
        let mut nodes = self.0.to_vec();
        nodes.push(node);
        Group::new(nodes)
    }

    /// Return a new group with `node` added at the start.
    pub fn prepended(&self, node: Node) -> Group {
        let mut nodes = Vec::with_capacity(self.len() + 1);
        nodes.push(node);
        nodes.extend_from_slice(&self.0);
        Group::new(nodes)
    }

    /// Return a new group with the node at `index` replaced.
    ///
    /// Returns `None` if `index` is out of bounds.
    pub fn updated(&self, index: usize, node: Node) -> Option<Group> {
        if index >= self.len() {
            return None;
        }
        let mut nodes = self.0.to_vec();
        nodes[index] = node;
        Some(Group::new(nodes))
    }

    /// Normalize the group into its minimal equivalent form.
    ///
    /// Adjacent text nodes are merged, as are adjacent CDATA sections unless
    /// joining them would produce `]]>`. Elements are canonicalized
    /// recursively.
    ///
    /// ```rust
    /// use xmlfrag::{Group, Node};
    ///
    /// let group = Group::new(vec![Node::text("a")?, Node::text("b")?]);
    /// let canonical = group.canonicalize();
    /// assert_eq!(canonical.len(), 1);
    /// assert_eq!(canonical[0], Node::text("ab")?);
    /// # Ok::<(), xmlfrag::Error>(())
    /// ```
    pub fn canonicalize(&self) -> Group {
        let mut stack = vec![Pending::new(None, self)];
        while let Some(top) = stack.last_mut() {
            match top.nodes.next() {
                Some(Node::Element(element)) => {
                    stack.push(Pending::new(Some(element), element.children()));
                }
                Some(node) => push_merged(&mut top.merged, node.clone()),
                None => {
                    let Some(done) = stack.pop() else { break };
                    let group = Group::new(done.merged);
                    match (done.element, stack.last_mut()) {
                        (Some(element), Some(parent)) => push_merged(
                            &mut parent.merged,
                            Node::Element(element.with_children(group)),
                        ),
                        _ => return group,
                    }
                }
            }
        }
        Group::empty()
    }

    // moves the children of uniquely owned elements onto `stack`
    fn detach_children(&mut self, stack: &mut Vec<Group>) {
        let Some(nodes) = Arc::get_mut(&mut self.0) else {
            return;
        };
        for node in nodes.iter_mut() {
            if let Node::Element(element) = node {
                if !element.children().is_empty() {
                    stack.push(element.take_children());
                }
            }
        }
    }
}

impl Drop for Group {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.detach_children(&mut stack);
        while let Some(mut group) = stack.pop() {
            group.detach_children(&mut stack);
        }
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if Arc::ptr_eq(&a.0, &b.0) {
                continue;
            }
            if a.len() != b.len() {
                return false;
            }
            for pair in a.iter().zip(b.iter()) {
                match pair {
                    (Node::Element(x), Node::Element(y)) => {
                        if !x.same_head(y) {
                            return false;
                        }
                        stack.push((x.children(), y.children()));
                    }
                    (Node::Element(_), _) | (_, Node::Element(_)) => return false,
                    (x, y) => {
                        if x != y {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }
}

impl Default for Group {
    fn default() -> Self {
        Group::empty()
    }
}

impl Deref for Group {
    type Target = [Node];

    fn deref(&self) -> &[Node] {
        &self.0
    }
}

impl From<Vec<Node>> for Group {
    fn from(nodes: Vec<Node>) -> Self {
        Group::new(nodes)
    }
}

impl FromIterator<Node> for Group {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Group(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Group {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

//! Arena-based document tree.
//!
//! All nodes live in a contiguous `Vec<NodeData>` owned by the `Document`
//! and are referenced by `NodeId`, a newtype over `NonZeroU32`. The child
//! chain (`first_child` .. `last_child` via `next_sibling`) is the tree's
//! ownership structure; `parent`, `prev_sibling` and `next_sibling` are
//! plain indices used for navigation only.
//!
//! Dropping the `Document` frees every node at once. Detached nodes stay
//! allocated in the arena but are unreachable from the root.

mod node;

pub use node::NodeKind;

use std::num::NonZeroU32;

use crate::error::ParseError;

/// A typed index into the document's node arena.
///
/// `Option<NodeId>` has the same size as `NodeId` (niche optimization).
/// Identity comparisons in the walker and finders are `NodeId` equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Creates a `NodeId` from a raw arena index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 0 or does not fit in a `u32`.
    #[allow(clippy::expect_used)]
    fn from_index(index: usize) -> Self {
        let raw = u32::try_from(index).expect("node arena exceeds u32::MAX entries");
        Self(NonZeroU32::new(raw).expect("NodeId index must be non-zero"))
    }

    fn as_index(self) -> usize {
        self.0.get() as usize
    }
}

/// Storage for a single node in the document arena.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// What kind of node this is and its payload.
    pub kind: NodeKind,
    /// Parent node. Absent for the document root and for detached nodes.
    pub parent: Option<NodeId>,
    /// First child node.
    pub first_child: Option<NodeId>,
    /// Last child node.
    pub last_child: Option<NodeId>,
    /// Next sibling.
    pub next_sibling: Option<NodeId>,
    /// Previous sibling.
    pub prev_sibling: Option<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// A name/value attribute on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute name.
    pub name: String,
    /// The attribute value with character references resolved.
    pub value: String,
}

impl Attribute {
    /// Creates an attribute from a name and value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An in-memory document tree.
///
/// Navigation and search go through `&Document`; building the tree goes
/// through `&mut Document`.
///
/// # Examples
///
/// ```
/// use xmlwalk::Document;
///
/// let doc = Document::parse_str("<root/>").unwrap();
/// let root = doc.root_element().unwrap();
/// assert_eq!(doc.node_name(root), Some("root"));
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    /// The node arena. Index 0 is an unused placeholder.
    nodes: Vec<NodeData>,
    /// The `Document` node at the top of the tree.
    root: NodeId,
    /// Version from the `<?xml ...?>` declaration, if present.
    pub version: Option<String>,
    /// Encoding from the `<?xml ...?>` declaration, if present.
    pub encoding: Option<String>,
    /// Standalone flag from the `<?xml ...?>` declaration, if present.
    pub standalone: Option<bool>,
}

impl Document {
    /// Creates a document holding only its root `Document` node.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        nodes.push(NodeData::new(NodeKind::Document));
        nodes.push(NodeData::new(NodeKind::Document));
        Self {
            nodes,
            root: NodeId::from_index(1),
            version: None,
            encoding: None,
            standalone: None,
        }
    }

    /// Loads a document from a string with default options.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the input is not well-formed.
    pub fn parse_str(input: &str) -> Result<Self, ParseError> {
        crate::parser::parse_str(input)
    }

    /// Loads a document from raw bytes, detecting the encoding from a BOM or
    /// the `<?xml ...?>` declaration.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the bytes cannot be decoded or the decoded
    /// text is not well-formed.
    pub fn parse_bytes(input: &[u8]) -> Result<Self, ParseError> {
        let text = crate::encoding::decode_to_utf8(input)?;
        crate::parser::parse_str(&text)
    }

    /// Returns the root `Document` node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the first element child of the root node.
    #[must_use]
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(self.root).find(|&id| self.is_element(id))
    }

    /// Returns the `NodeData` for the given node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this document.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.as_index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.as_index()]
    }

    /// Returns `true` if the node is an element.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.node(id).kind.is_element()
    }

    /// Returns the tag name of an element node.
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns the string payload of a text, opaque, CDATA or comment node.
    ///
    /// Elements, numeric leaves and the document node return `None`.
    #[must_use]
    pub fn node_text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Text { content }
            | NodeKind::Opaque { content }
            | NodeKind::CData { content }
            | NodeKind::Comment { content } => Some(content),
            _ => None,
        }
    }

    /// Returns the concatenated character data of a node and its descendants.
    ///
    /// Numeric leaves contribute their decimal rendering; comments contribute
    /// nothing.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut result = String::new();
        self.collect_text(id, &mut result);
        result
    }

    fn collect_text(&self, id: NodeId, buf: &mut String) {
        match &self.node(id).kind {
            NodeKind::Text { content }
            | NodeKind::Opaque { content }
            | NodeKind::CData { content } => buf.push_str(content),
            NodeKind::Integer { value } => buf.push_str(&value.to_string()),
            NodeKind::Real { value } => buf.push_str(&value.to_string()),
            NodeKind::Comment { .. } => {}
            NodeKind::Document | NodeKind::Element { .. } => {
                for child in self.children(id) {
                    self.collect_text(child, buf);
                }
            }
        }
    }

    /// Returns the attributes of an element node, or an empty slice.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match &self.node(id).kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Returns the value of an attribute by name on an element node.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    // --- Navigation ---

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    /// Returns the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child
    }

    /// Returns the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling
    }

    /// Returns the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_sibling
    }

    /// Returns an iterator over the children of a node.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.node(id).first_child,
        }
    }

    /// Returns an iterator over a node and its ancestors, ending at the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: Some(id),
        }
    }

    /// Returns an iterator over all descendants of a node in document order.
    ///
    /// Equivalent to repeatedly calling
    /// [`walk_next`](Document::walk_next) with `Descend::Always` and the
    /// node itself as the boundary.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            top: id,
            next: self.first_child(id),
        }
    }

    // --- Mutation ---

    /// Allocates a new detached node and returns its `NodeId`.
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let index = self.nodes.len();
        self.nodes.push(NodeData::new(kind));
        NodeId::from_index(index)
    }

    /// Allocates a detached element with no attributes.
    pub fn create_element(&mut self, name: impl Into<String>) -> NodeId {
        self.create_node(NodeKind::Element {
            name: name.into(),
            attributes: Vec::new(),
        })
    }

    /// Allocates a detached text node.
    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        self.create_node(NodeKind::Text {
            content: content.into(),
        })
    }

    /// Sets an attribute on an element, replacing any existing value.
    ///
    /// Has no effect on non-element nodes.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let NodeKind::Element { attributes, .. } = &mut self.node_mut(id).kind {
            let value = value.into();
            match attributes.iter_mut().find(|a| a.name == name) {
                Some(existing) => existing.value = value,
                None => attributes.push(Attribute::new(name, value)),
            }
        }
    }

    /// Appends a child node to the end of a parent's child list.
    ///
    /// # Panics
    ///
    /// Debug builds panic if `child` already has a parent. Detach it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            self.node(child).parent.is_none(),
            "child already has a parent; detach it first"
        );

        self.node_mut(child).parent = Some(parent);

        if let Some(last) = self.node(parent).last_child {
            self.node_mut(last).next_sibling = Some(child);
            self.node_mut(child).prev_sibling = Some(last);
            self.node_mut(parent).last_child = Some(child);
        } else {
            self.node_mut(parent).first_child = Some(child);
            self.node_mut(parent).last_child = Some(child);
        }
    }

    /// Unlinks a node (and its subtree) from its parent.
    ///
    /// The node stays allocated and keeps its own children.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).parent else {
            return;
        };

        let prev = self.node(id).prev_sibling;
        let next = self.node(id).next_sibling;

        match prev {
            Some(p) => self.node_mut(p).next_sibling = next,
            None => self.node_mut(parent).first_child = next,
        }

        match next {
            Some(n) => self.node_mut(n).prev_sibling = prev,
            None => self.node_mut(parent).last_child = prev,
        }

        let data = self.node_mut(id);
        data.parent = None;
        data.prev_sibling = None;
        data.next_sibling = None;
    }

    /// Returns the number of allocated nodes, detached ones included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// --- Iterators ---

/// Iterator over the children of a node.
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.next_sibling(current);
        Some(current)
    }
}

/// Iterator over a node and its ancestors.
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

/// Depth-first iterator over the descendants of a node.
pub struct Descendants<'a> {
    doc: &'a Document,
    top: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self
            .doc
            .walk_next(current, self.top, crate::search::Descend::Always);
        Some(current)
    }
}

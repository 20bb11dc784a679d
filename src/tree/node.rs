//! Node type definitions.
//!
//! `NodeKind` carries the per-kind payload of a node. Navigation links
//! (parent, children, siblings) live in `NodeData`, not here.

use super::Attribute;

/// The kind of a node and its associated data.
///
/// Only `Element` nodes have a name, attributes and children. Every other
/// kind is a leaf holding a value payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The container node at the root of a loaded document.
    Document,

    /// An element node, e.g., `<server port="80">`.
    Element {
        /// The element's tag name.
        name: String,
        /// Attributes on this element. Names are unique.
        attributes: Vec<Attribute>,
    },

    /// Character data.
    Text {
        /// The text content with character references resolved.
        content: String,
    },

    /// Character data loaded as a signed integer.
    Integer {
        /// The parsed value.
        value: i64,
    },

    /// Character data loaded as a floating-point number.
    Real {
        /// The parsed value.
        value: f64,
    },

    /// Character data kept verbatim, surrounding whitespace included.
    Opaque {
        /// The raw content.
        content: String,
    },

    /// A CDATA section, e.g., `<![CDATA[...]]>`.
    CData {
        /// The CDATA content.
        content: String,
    },

    /// A comment, e.g., `<!-- ... -->`.
    Comment {
        /// The comment text without delimiters.
        content: String,
    },
}

impl NodeKind {
    /// Returns `true` for `Element` nodes.
    #[must_use]
    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element { .. })
    }

    /// Returns `true` for `Text` nodes.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }

    /// Short lowercase label for the kind, used in diagnostics and CLI output.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Element { .. } => "element",
            Self::Text { .. } => "text",
            Self::Integer { .. } => "integer",
            Self::Real { .. } => "real",
            Self::Opaque { .. } => "opaque",
            Self::CData { .. } => "cdata",
            Self::Comment { .. } => "comment",
        }
    }
}

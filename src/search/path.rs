//! Slash-separated path lookup.
//!
//! A path is a list of element names separated by `/`, such as
//! `"config/server/port"`. Each name is looked up among the direct children
//! of the node the previous name resolved to. Prefixing a name with `*/`
//! searches the whole subtree for it instead, so `"config/*/port"` finds a
//! `port` element at any depth below `config`.

use super::{Descend, ElementQuery};
use crate::error::PathError;
use crate::tree::{Document, NodeId};

/// Segment names must be shorter than this many bytes.
pub const MAX_SEGMENT_LEN: usize = 256;

const WILDCARD: &str = "*/";

/// How a path segment looks for its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentMode {
    /// Only the direct children of the current node are candidates.
    FirstLevel,
    /// Any descendant of the current node is a candidate.
    Anywhere,
}

impl SegmentMode {
    /// The walk policy used when resolving a segment with this mode.
    #[must_use]
    pub fn descend(self) -> Descend {
        match self {
            Self::FirstLevel => Descend::First,
            Self::Anywhere => Descend::Always,
        }
    }
}

/// One parsed hop of a search path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSegment<'a> {
    /// Element name to look for.
    pub name: &'a str,
    /// Where to look for it.
    pub mode: SegmentMode,
}

/// Splits a path into segments without touching any tree.
///
/// A leading `*/` on a segment switches it to [`SegmentMode::Anywhere`].
/// A single trailing slash is accepted, and a bare `*` not followed by a
/// slash is an ordinary element name.
///
/// # Errors
///
/// Returns [`PathError`] for an empty path, an empty segment, or a segment
/// of [`MAX_SEGMENT_LEN`] bytes or more.
///
/// # Examples
///
/// ```
/// use xmlwalk::search::{parse_path, SegmentMode};
///
/// let segments = parse_path("settings/*/timeout").unwrap();
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[1].name, "timeout");
/// assert_eq!(segments[1].mode, SegmentMode::Anywhere);
/// ```
pub fn parse_path(path: &str) -> Result<Vec<PathSegment<'_>>, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let mut segments = Vec::new();
    let mut offset = 0;
    while offset < path.len() {
        let mut rest = &path[offset..];
        let mode = if let Some(after) = rest.strip_prefix(WILDCARD) {
            offset += WILDCARD.len();
            rest = after;
            SegmentMode::Anywhere
        } else {
            SegmentMode::FirstLevel
        };

        let len = rest.find('/').unwrap_or(rest.len());
        if len == 0 {
            return Err(PathError::EmptySegment { offset });
        }
        if len >= MAX_SEGMENT_LEN {
            return Err(PathError::SegmentTooLong {
                offset,
                len,
                limit: MAX_SEGMENT_LEN,
            });
        }

        segments.push(PathSegment {
            name: &rest[..len],
            mode,
        });
        // Step over the separator too, if there is one.
        offset = (offset + len + 1).min(path.len());
    }

    Ok(segments)
}

impl Document {
    /// Resolves a slash-separated element path starting at `top`.
    ///
    /// Every hop is confined to the subtree of the node the previous hop
    /// resolved to. If the final element's first child exists and is not an
    /// element, that child is returned instead of the element, so a path
    /// to `<timeout>30</timeout>` yields the text node `"30"`.
    ///
    /// Returns `None` if the path is malformed (see [`parse_path`]) or any
    /// hop finds nothing. A malformed path is rejected before the tree is
    /// touched.
    ///
    /// # Examples
    ///
    /// ```
    /// use xmlwalk::Document;
    ///
    /// let doc = Document::parse_str(
    ///     "<root><foo><one><two>42</two></one></foo></root>",
    /// ).unwrap();
    /// let root = doc.root_element().unwrap();
    ///
    /// let value = doc.find_path(root, "foo/*/two").unwrap();
    /// assert_eq!(doc.node_text(value), Some("42"));
    /// assert_eq!(doc.find_path(root, "foo/two"), None);
    /// ```
    #[must_use]
    pub fn find_path(&self, top: NodeId, path: &str) -> Option<NodeId> {
        let segments = parse_path(path).ok()?;

        let mut node = top;
        for segment in &segments {
            let query = ElementQuery::named(segment.name);
            node = self.find_element(node, node, &query, segment.mode.descend())?;
        }

        match self.first_child(node) {
            Some(child) if !self.is_element(child) => Some(child),
            _ => Some(node),
        }
    }
}

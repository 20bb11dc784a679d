//! Bounded tree walking and node search.
//!
//! Everything here is a read-only method on [`Document`](crate::Document):
//!
//! - [`walk_next`](crate::Document::walk_next) and
//!   [`walk_prev`](crate::Document::walk_prev) step through the tree in
//!   document order without leaving the subtree of a caller-supplied `top`
//!   node.
//! - [`find_element`](crate::Document::find_element) and
//!   [`find_element_text`](crate::Document::find_element_text) filter that
//!   walk for elements or text nodes.
//! - [`find_path`](crate::Document::find_path) resolves a slash-separated
//!   list of element names one hop at a time.
//!
//! There is no cursor object. To enumerate every match, pass the node
//! returned by one call back in as the starting node of the next:
//!
//! ```
//! use xmlwalk::search::{Descend, ElementQuery};
//! use xmlwalk::Document;
//!
//! let doc = Document::parse_str("<r><a/><b><a/></b><a/></r>").unwrap();
//! let top = doc.root_element().unwrap();
//! let query = ElementQuery::named("a");
//!
//! let mut found = 0;
//! let mut cursor = doc.find_element(top, top, &query, Descend::Always);
//! while let Some(node) = cursor {
//!     found += 1;
//!     cursor = doc.find_element(node, top, &query, Descend::Always);
//! }
//! assert_eq!(found, 3);
//! ```
//!
//! No search fails with an error. Invalid constraints, an exhausted walk
//! and an unresolvable path all come back as `None`.

mod find;
mod path;
mod walk;

pub use find::ElementQuery;
pub use path::{parse_path, PathSegment, SegmentMode, MAX_SEGMENT_LEN};

/// Whether a traversal step may move from a node into its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Descend {
    /// Never step into children; only siblings and the ancestor chain.
    Never,
    /// Step into children on every step. Searches visit the whole subtree.
    #[default]
    Always,
    /// Step into children on the first step only. Searches then continue
    /// along plain next-sibling links, which limits them to one level.
    First,
}

impl Descend {
    /// Returns `true` if a single walk step may move to a first or last child.
    #[must_use]
    pub fn enters_children(self) -> bool {
        !matches!(self, Self::Never)
    }

    /// The policy to pass when resuming a search from its previous match.
    ///
    /// An `Always` search keeps descending. A `First` search has already
    /// stepped into the level it scans, so it continues with `Never` along
    /// the siblings of the match; resuming with `First` would step into the
    /// match's own children instead.
    #[must_use]
    pub fn resume(self) -> Self {
        match self {
            Self::Always => Self::Always,
            Self::First | Self::Never => Self::Never,
        }
    }
}

//! Bounded pre-order walking in both directions.

use super::Descend;
use crate::tree::{Document, NodeId};

impl Document {
    /// Returns the node after `node` in document order, or `None` once the
    /// subtree rooted at `top` is exhausted.
    ///
    /// With a descending policy the walk enters `node`'s first child before
    /// moving on to siblings. The walk never leaves `top`: calling this on
    /// `top` itself only ever yields its first child, and climbing back up
    /// stops before reaching `top` or any of its ancestors.
    ///
    /// # Examples
    ///
    /// ```
    /// use xmlwalk::search::Descend;
    /// use xmlwalk::Document;
    ///
    /// let doc = Document::parse_str("<r><a><b/></a><c/></r>").unwrap();
    /// let r = doc.root_element().unwrap();
    ///
    /// let mut names = Vec::new();
    /// let mut node = doc.walk_next(r, r, Descend::Always);
    /// while let Some(id) = node {
    ///     names.push(doc.node_name(id).unwrap());
    ///     node = doc.walk_next(id, r, Descend::Always);
    /// }
    /// assert_eq!(names, ["a", "b", "c"]);
    /// ```
    #[must_use]
    pub fn walk_next(&self, node: NodeId, top: NodeId, descend: Descend) -> Option<NodeId> {
        let data = self.node(node);

        if descend.enters_children() {
            if let Some(child) = data.first_child {
                return Some(child);
            }
        }
        if node == top {
            return None;
        }
        if let Some(next) = data.next_sibling {
            return Some(next);
        }

        let mut ancestor = data.parent.filter(|&p| p != top)?;
        loop {
            let anc = self.node(ancestor);
            if let Some(next) = anc.next_sibling {
                return Some(next);
            }
            ancestor = anc.parent.filter(|&p| p != top)?;
        }
    }

    /// Returns the node before `node` in document order, or `None` once the
    /// walk would reach `top`.
    ///
    /// With a descending policy, stepping back onto a previous sibling that
    /// has children lands on that sibling's deepest last descendant, which
    /// makes this the exact reverse of [`walk_next`](Document::walk_next).
    #[must_use]
    pub fn walk_prev(&self, node: NodeId, top: NodeId, descend: Descend) -> Option<NodeId> {
        if node == top {
            return None;
        }

        let data = self.node(node);
        if let Some(prev) = data.prev_sibling {
            if descend.enters_children() {
                if let Some(mut deepest) = self.last_child(prev) {
                    while let Some(last) = self.last_child(deepest) {
                        deepest = last;
                    }
                    return Some(deepest);
                }
            }
            return Some(prev);
        }

        data.parent.filter(|&p| p != top)
    }
}

//! Element and text search layered on the walker.

use super::Descend;
use crate::tree::{Document, NodeId, NodeKind};

/// Constraints for [`Document::find_element`].
///
/// Every field is optional; an absent field matches anything. A `value`
/// only makes sense together with `attr`: a query that sets `value` alone
/// never matches.
///
/// ```
/// use xmlwalk::search::ElementQuery;
///
/// let any = ElementQuery::any();
/// let items = ElementQuery::named("item");
/// let second = ElementQuery::named("item").with_attr_value("id", "2");
/// let tagged = ElementQuery::any().with_attr("id");
/// # let _ = (any, items, second, tagged);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementQuery<'a> {
    /// Required element name, or `None` for any name.
    pub name: Option<&'a str>,
    /// Attribute the element must carry.
    pub attr: Option<&'a str>,
    /// Exact value `attr` must have.
    pub value: Option<&'a str>,
}

impl<'a> ElementQuery<'a> {
    /// Matches every element.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Matches elements with the given name.
    #[must_use]
    pub fn named(name: &'a str) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }

    /// Additionally requires the attribute to be present.
    #[must_use]
    pub fn with_attr(mut self, attr: &'a str) -> Self {
        self.attr = Some(attr);
        self
    }

    /// Additionally requires the attribute to be present with exactly `value`.
    #[must_use]
    pub fn with_attr_value(mut self, attr: &'a str, value: &'a str) -> Self {
        self.attr = Some(attr);
        self.value = Some(value);
        self
    }

    /// Returns `false` for a value constraint without an attribute name.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.attr.is_some() || self.value.is_none()
    }

    fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let NodeKind::Element { name, .. } = &doc.node(id).kind else {
            return false;
        };
        if name.is_empty() || self.name.is_some_and(|want| want != name) {
            return false;
        }
        match self.attr {
            None => true,
            Some(attr) => doc
                .attribute(id, attr)
                .is_some_and(|found| self.value.map_or(true, |want| want == found)),
        }
    }
}

impl Document {
    /// Finds the next element after `node` matching `query`.
    ///
    /// The first candidate is `walk_next(node, top, descend)`; `node` itself
    /// is never returned. After that, `Descend::Always` keeps walking the
    /// whole subtree of `top`, while `Descend::First` and `Descend::Never`
    /// only follow next-sibling links. So `Descend::First` from a parent
    /// searches its direct children, and `Descend::Never` from a child
    /// searches that child's following siblings.
    ///
    /// Returns `None` when nothing matches or the query is invalid (see
    /// [`ElementQuery::is_valid`]).
    ///
    /// # Examples
    ///
    /// ```
    /// use xmlwalk::search::{Descend, ElementQuery};
    /// use xmlwalk::Document;
    ///
    /// let doc = Document::parse_str(r#"<r><a id="1"/><a id="2"/></r>"#).unwrap();
    /// let r = doc.root_element().unwrap();
    /// let query = ElementQuery::named("a").with_attr_value("id", "2");
    ///
    /// let found = doc.find_element(r, r, &query, Descend::Always).unwrap();
    /// assert_eq!(doc.attribute(found, "id"), Some("2"));
    /// ```
    #[must_use]
    pub fn find_element(
        &self,
        node: NodeId,
        top: NodeId,
        query: &ElementQuery<'_>,
        descend: Descend,
    ) -> Option<NodeId> {
        if !query.is_valid() {
            return None;
        }
        self.find_first(node, top, descend, |id| query.matches(self, id))
    }

    /// Finds the next `Text` node after `node` whose content is exactly `text`.
    ///
    /// Matching is case-sensitive and whole-string; other leaf kinds
    /// (opaque, CDATA, numeric) are never matched. Walking and resuming
    /// follow [`find_element`](Document::find_element).
    #[must_use]
    pub fn find_element_text(
        &self,
        node: NodeId,
        top: NodeId,
        text: &str,
        descend: Descend,
    ) -> Option<NodeId> {
        self.find_first(node, top, descend, |id| {
            matches!(&self.node(id).kind, NodeKind::Text { content } if content == text)
        })
    }

    fn find_first(
        &self,
        node: NodeId,
        top: NodeId,
        descend: Descend,
        mut accept: impl FnMut(NodeId) -> bool,
    ) -> Option<NodeId> {
        let mut candidate = self.walk_next(node, top, descend);
        while let Some(id) = candidate {
            if accept(id) {
                return Some(id);
            }
            candidate = match descend {
                Descend::Always => self.walk_next(id, top, Descend::Always),
                Descend::First | Descend::Never => self.next_sibling(id),
            };
        }
        None
    }
}

#![forbid(unsafe_code)]

//! NodeSet: the externally computed inclusion predicate for
//! document-subset canonicalization.
//!
//! Selection itself (XPath evaluation, signature reference dereferencing)
//! happens in the layer above; the canonicalizer only asks "is this node
//! in the set".

use crate::tree::{Document, NodeId, NodeKind};
use std::collections::HashSet;

/// A set of XML document nodes identified by arena index.
#[derive(Debug, Clone, Default)]
pub struct NodeSet {
    nodes: HashSet<usize>,
}

impl NodeSet {
    /// Create an empty node set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node set from raw node indices.
    pub fn from_ids(ids: HashSet<usize>) -> Self {
        Self { nodes: ids }
    }

    /// Create a node set containing every node in the document.
    pub fn all(doc: &Document) -> Self {
        let mut nodes: HashSet<usize> = HashSet::new();
        nodes.insert(doc.root().index());
        for id in doc.descendants(doc.root()) {
            nodes.insert(id.index());
        }
        Self { nodes }
    }

    /// Create a node set containing every node except comments.
    /// Per the W3C DSig spec, `URI=""` selects the document without
    /// comments.
    pub fn all_without_comments(doc: &Document) -> Self {
        let mut nodes: HashSet<usize> = HashSet::new();
        nodes.insert(doc.root().index());
        for id in doc.descendants(doc.root()) {
            if !matches!(doc.kind(id), Some(NodeKind::Comment(_))) {
                nodes.insert(id.index());
            }
        }
        Self { nodes }
    }

    /// Create a node set for the subtree rooted at `root_id`, including
    /// comment nodes.
    pub fn tree_with_comments(root_id: NodeId, doc: &Document) -> Self {
        let mut nodes: HashSet<usize> = HashSet::new();
        nodes.insert(root_id.index());
        for id in doc.descendants(root_id) {
            nodes.insert(id.index());
        }
        Self { nodes }
    }

    /// Create a node set for the subtree rooted at `root_id`, excluding
    /// comment nodes.
    pub fn tree_without_comments(root_id: NodeId, doc: &Document) -> Self {
        let mut nodes: HashSet<usize> = HashSet::new();
        nodes.insert(root_id.index());
        for id in doc.descendants(root_id) {
            if !matches!(doc.kind(id), Some(NodeKind::Comment(_))) {
                nodes.insert(id.index());
            }
        }
        Self { nodes }
    }

    /// Check if a node is in this set.
    pub fn contains_id(&self, id: NodeId) -> bool {
        self.nodes.contains(&id.index())
    }

    /// Add a node to this set.
    pub fn insert_id(&mut self, id: NodeId) {
        self.nodes.insert(id.index());
    }

    /// Remove a node from this set.
    pub fn remove_id(&mut self, id: NodeId) {
        self.nodes.remove(&id.index());
    }

    /// Check if this set is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes in the set.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Element, QName};

    fn sample() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let a = doc.append_child(doc.root(), NodeKind::Element(Element::new(QName::local("a"))));
        let b = doc.append_child(a, NodeKind::Element(Element::new(QName::local("b"))));
        doc.append_child(a, NodeKind::Comment("c".into()));
        (doc, a, b)
    }

    #[test]
    fn test_all_and_without_comments() {
        let (doc, _, _) = sample();
        assert_eq!(NodeSet::all(&doc).len(), 4);
        assert_eq!(NodeSet::all_without_comments(&doc).len(), 3);
    }

    #[test]
    fn test_tree_sets() {
        let (doc, a, b) = sample();
        let sub = NodeSet::tree_without_comments(b, &doc);
        assert!(sub.contains_id(b));
        assert!(!sub.contains_id(a));
        assert_eq!(NodeSet::tree_with_comments(a, &doc).len(), 3);
    }

    #[test]
    fn test_insert_remove() {
        let (doc, a, b) = sample();
        let mut set = NodeSet::new();
        assert!(set.is_empty());
        set.insert_id(a);
        set.insert_id(b);
        assert_eq!(set.len(), 2);
        set.remove_id(a);
        assert!(!set.contains_id(a));
        assert!(set.contains_id(b));
        let _ = doc;
    }
}

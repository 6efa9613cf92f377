#![forbid(unsafe_code)]

//! Owned XML document tree.
//!
//! Nodes live in a flat arena addressed by [`NodeId`]; index 0 is always
//! the document node. The kind set is closed: the canonicalizer dispatches
//! over it exhaustively.

/// Identifier of a node within one [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The arena index of this node.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A qualified XML name: optional prefix, local name, optional namespace URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName {
    pub prefix: Option<String>,
    pub local_name: String,
    pub namespace_uri: Option<String>,
}

impl QName {
    /// A name with no prefix and no namespace.
    pub fn local(local_name: &str) -> Self {
        Self {
            prefix: None,
            local_name: local_name.to_owned(),
            namespace_uri: None,
        }
    }

    /// A namespaced name. `prefix` of `None` means the default namespace.
    pub fn with_namespace(prefix: Option<&str>, local_name: &str, namespace_uri: &str) -> Self {
        Self {
            prefix: prefix.map(str::to_owned),
            local_name: local_name.to_owned(),
            namespace_uri: Some(namespace_uri.to_owned()),
        }
    }

    /// The qualified form: `prefix:local` or just `local`.
    pub fn qualified(&self) -> String {
        match &self.prefix {
            Some(p) if !p.is_empty() => format!("{}:{}", p, self.local_name),
            _ => self.local_name.clone(),
        }
    }
}

/// An attribute of an element. Namespace declarations are not attributes
/// here; they live in [`Element::namespace_declarations`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

/// A processing instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pi {
    pub target: String,
    pub data: Option<String>,
}

/// An element: name, attributes, and the namespace declarations written
/// on this element itself (prefix → URI; empty prefix is the default
/// namespace, empty URI is an undeclaration).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: QName,
    pub attributes: Vec<Attribute>,
    pub namespace_declarations: Vec<(String, String)>,
}

impl Element {
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            namespace_declarations: Vec::new(),
        }
    }
}

/// The closed set of node kinds.
///
/// `CData` serializes under the text rule. `Whitespace` and
/// `SignificantWhitespace` differ from `Text` only in that they are
/// dropped outside the document element. `EntityReference` children hold
/// the expansion; the reference itself is never re-serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element(Element),
    Text(String),
    CData(String),
    Whitespace(String),
    SignificantWhitespace(String),
    Comment(String),
    ProcessingInstruction(Pi),
    EntityReference(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An owned XML document tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Document {
    /// Create an empty document containing only the document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The document node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The kind of a node, if the id is valid for this arena.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id.0).map(|n| &n.kind)
    }

    /// The parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    /// Children of a node, in document order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    /// The element data of a node, if it is an element.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.kind(id)? {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    /// All descendants of a node in document order, excluding the node
    /// itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut pending: Vec<NodeId> = self.children(id).collect();
        pending.reverse();
        while let Some(next) = pending.pop() {
            out.push(next);
            let mut kids: Vec<NodeId> = self.children(next).collect();
            kids.reverse();
            pending.append(&mut kids);
        }
        out
    }

    /// The document element (the single element child of the document
    /// node), if present.
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(self.root())
            .find(|id| matches!(self.kind(*id), Some(NodeKind::Element(_))))
    }

    /// Find the first descendant element with the given local name and
    /// namespace URI (`None` = no namespace).
    pub fn find_element(&self, namespace: Option<&str>, local_name: &str) -> Option<NodeId> {
        self.descendants(self.root()).into_iter().find(|id| {
            self.element(*id).is_some_and(|e| {
                e.name.local_name == local_name && e.name.namespace_uri.as_deref() == namespace
            })
        })
    }

    /// Append a new node under `parent` and return its id.
    pub fn append_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(id);
        }
        id
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_and_navigate() {
        let mut doc = Document::new();
        let root = doc.append_child(doc.root(), NodeKind::Element(Element::new(QName::local("a"))));
        let b = doc.append_child(root, NodeKind::Element(Element::new(QName::local("b"))));
        doc.append_child(b, NodeKind::Text("hi".into()));

        assert_eq!(doc.document_element(), Some(root));
        assert_eq!(doc.parent(b), Some(root));
        assert_eq!(doc.children(root).count(), 1);
        assert_eq!(doc.descendants(doc.root()).len(), 3);
        assert!(doc.element(b).is_some());
    }

    #[test]
    fn test_find_element() {
        let mut doc = Document::new();
        let root = doc.append_child(doc.root(), NodeKind::Element(Element::new(QName::local("a"))));
        let ns = "urn:example";
        doc.append_child(
            root,
            NodeKind::Element(Element::new(QName::with_namespace(Some("x"), "b", ns))),
        );

        assert!(doc.find_element(Some(ns), "b").is_some());
        assert!(doc.find_element(None, "b").is_none());
        assert!(doc.find_element(None, "a").is_some());
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(QName::local("a").qualified(), "a");
        assert_eq!(
            QName::with_namespace(Some("x"), "b", "urn:x").qualified(),
            "x:b"
        );
        assert_eq!(QName::with_namespace(None, "b", "urn:x").qualified(), "b");
    }
}

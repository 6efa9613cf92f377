#![forbid(unsafe_code)]

//! Per-node-kind serialization rules and the generic recursive
//! dispatcher.
//!
//! The walk is depth-first and single-threaded: entering an element
//! pushes a namespace frame, the active strategy decides what renders at
//! that element, children follow, and exiting pops the frame. Each
//! canonicalization pass owns its stack; nothing survives the pass.

use crate::output::CanonicalOutput;
use crate::render::{Attr, NsDecl};
use crate::stack::AncestorStack;
use crate::strategy::{stash_local, LocalDecls, NamespaceStrategy, RenderLists};
use crate::{escape, C14nMode};
use sigtuna_core::{ns, Error, Result};
use sigtuna_xml::{Document, NodeId, NodeKind, NodeSet, Pi};

/// Position of the node being serialized relative to the document
/// element. Maintained by the walk and consulted read-only by the
/// per-kind rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocPosition {
    BeforeRootElement,
    InRootElement,
    AfterRootElement,
}

/// One canonicalization pass over one document and node-set.
pub struct Canonicalizer<'a, S> {
    doc: &'a Document,
    node_set: Option<&'a NodeSet>,
    with_comments: bool,
    strategy: S,
    stack: AncestorStack,
}

impl<'a, S: NamespaceStrategy> Canonicalizer<'a, S> {
    pub fn new(
        doc: &'a Document,
        node_set: Option<&'a NodeSet>,
        mode: C14nMode,
        strategy: S,
    ) -> Self {
        Self {
            doc,
            node_set,
            with_comments: mode.with_comments(),
            strategy,
            stack: AncestorStack::new(),
        }
    }

    /// Serialize the whole document into the sink.
    pub fn write_document<O: CanonicalOutput>(&mut self, out: &mut O) -> Result<()> {
        let doc = self.doc;
        let mut pos = DocPosition::BeforeRootElement;
        for child in doc.children(doc.root()) {
            if matches!(doc.kind(child), Some(NodeKind::Element(_))) {
                self.write_node(child, out, DocPosition::InRootElement)?;
                pos = DocPosition::AfterRootElement;
            } else {
                self.write_node(child, out, pos)?;
            }
        }
        Ok(())
    }

    fn is_visible(&self, id: NodeId) -> bool {
        match self.node_set {
            None => true,
            Some(set) => set.contains_id(id),
        }
    }

    /// Generic dispatch: node kinds with their own rule serialize
    /// themselves; entity references expand through their children;
    /// anything that cannot legally sit here is malformed input.
    fn write_node<O: CanonicalOutput>(
        &mut self,
        id: NodeId,
        out: &mut O,
        pos: DocPosition,
    ) -> Result<()> {
        let doc = self.doc;
        let kind = doc
            .kind(id)
            .ok_or_else(|| Error::MalformedInput(format!("unknown node id {}", id.index())))?;
        match kind {
            NodeKind::Element(_) => self.write_element(id, out),
            NodeKind::Text(text) | NodeKind::CData(text) => {
                if self.is_visible(id) {
                    escape::escape_text(text, out);
                }
                Ok(())
            }
            NodeKind::Whitespace(text) | NodeKind::SignificantWhitespace(text) => {
                // Whitespace outside the document element never appears.
                if self.is_visible(id) && pos == DocPosition::InRootElement {
                    escape::escape_text(text, out);
                }
                Ok(())
            }
            NodeKind::ProcessingInstruction(pi) => {
                if self.is_visible(id) {
                    write_pi(pi, out, pos);
                }
                Ok(())
            }
            NodeKind::Comment(text) => {
                if self.with_comments && self.is_visible(id) {
                    write_comment(text, out, pos);
                }
                Ok(())
            }
            NodeKind::EntityReference(_) => {
                // Entities expand transparently; the reference itself is
                // never re-serialized.
                for child in doc.children(id) {
                    self.write_node(child, out, pos)?;
                }
                Ok(())
            }
            NodeKind::Document => Err(Error::MalformedInput(
                "document node encountered below the root".to_owned(),
            )),
        }
    }

    fn write_element<O: CanonicalOutput>(&mut self, id: NodeId, out: &mut O) -> Result<()> {
        let doc = self.doc;
        let elem = doc
            .element(id)
            .ok_or_else(|| Error::MalformedInput("expected an element node".to_owned()))?;
        let visible = self.is_visible(id);

        let mut lists = RenderLists::default();
        let mut local = LocalDecls::new();

        // Attribute axis: declarations and xml: attributes feed the
        // strategy on visible elements; on excluded elements they are
        // only recorded so visible descendants can still resolve them.
        for (prefix, uri) in &elem.namespace_declarations {
            if prefix == "xml" {
                continue;
            }
            let decl = NsDecl::namespace(prefix, uri);
            if visible {
                self.strategy
                    .track_namespace_node(decl, &mut lists, &mut local, &self.stack)?;
            } else {
                stash_local(&mut local, decl)?;
            }
        }
        for attr in &elem.attributes {
            if attr.name.namespace_uri.as_deref() == Some(ns::XML) {
                let decl = NsDecl::xml_attribute(&attr.name.local_name, &attr.value);
                if visible {
                    self.strategy
                        .track_xml_namespace_node(decl, &mut lists, &mut local, &self.stack)?;
                } else {
                    stash_local(&mut local, decl)?;
                }
            } else if visible {
                lists.attributes.push(Attr::from_attribute(attr));
            }
        }

        if visible {
            // The element's own binding may come from an enclosing
            // declaration; track a synthetic one so the redundancy check
            // still runs for its prefix (this also produces xmlns=""
            // when a rendered default must be undeclared).
            let element_prefix = elem.name.prefix.clone().unwrap_or_default();
            if element_prefix != "xml"
                && !local.contains_key(&element_prefix)
                && !lists.contains_key(&element_prefix)
            {
                let uri = elem.name.namespace_uri.clone().unwrap_or_default();
                self.strategy.track_namespace_node(
                    NsDecl::namespace(&element_prefix, &uri),
                    &mut lists,
                    &mut local,
                    &self.stack,
                )?;
            }

            self.strategy
                .get_namespaces_to_render(elem, &mut lists, &mut local, &self.stack)?;
            lists.namespaces.sort();
            lists.attributes.sort();

            out.write_str("<");
            out.write_str(&elem.name.qualified());
            for decl in &lists.namespaces {
                decl.write(out);
            }
            for attr in &lists.attributes {
                attr.write(out);
            }
            out.write_str(">");
        }

        self.stack.enter_element_context();
        self.stack.load_unrendered_namespaces(local)?;
        if visible {
            self.stack.load_rendered_namespaces(&lists.namespaces)?;
        }

        for child in doc.children(id) {
            self.write_node(child, out, DocPosition::InRootElement)?;
        }

        self.stack.exit_element_context()?;

        if visible {
            out.write_str("</");
            out.write_str(&elem.name.qualified());
            out.write_str(">");
        }
        Ok(())
    }
}

/// `<?target data?>`, with a leading newline after the document element
/// and a trailing newline before it. The position-aware newlines
/// normalize inter-sibling spacing around the root instead of copying
/// source whitespace.
fn write_pi<O: CanonicalOutput>(pi: &Pi, out: &mut O, pos: DocPosition) {
    if pos == DocPosition::AfterRootElement {
        out.write_str("\n");
    }
    out.write_str("<?");
    out.write_str(&pi.target);
    if let Some(data) = &pi.data {
        if !data.is_empty() {
            out.write_str(" ");
            escape::escape_pi(data, out);
        }
    }
    out.write_str("?>");
    if pos == DocPosition::BeforeRootElement {
        out.write_str("\n");
    }
}

/// `<!--text-->`, with the same root-relative newline rule as
/// processing instructions.
fn write_comment<O: CanonicalOutput>(text: &str, out: &mut O, pos: DocPosition) {
    if pos == DocPosition::AfterRootElement {
        out.write_str("\n");
    }
    out.write_str("<!--");
    out.write_str(text);
    out.write_str("-->");
    if pos == DocPosition::BeforeRootElement {
        out.write_str("\n");
    }
}

#![forbid(unsafe_code)]

//! Ancestor namespace context: per-element frames on a stack mirroring
//! the open-element path.
//!
//! Each frame partitions the declarations observed at its element into
//! *rendered* (already written to output at that depth) and *unrendered*
//! (in scope but not yet written). Strategies consult the nearest
//! enclosing entry for a prefix to decide redundancy and on-demand
//! rendering.

use crate::render::NsDecl;
use sigtuna_core::{Error, Result};
use std::collections::BTreeMap;

/// Rendering state for one open element.
#[derive(Debug, Default)]
pub struct NsFrame {
    rendered: BTreeMap<String, NsDecl>,
    unrendered: BTreeMap<String, NsDecl>,
}

impl NsFrame {
    /// Record a declaration as rendered at this element.
    pub fn add_rendered(&mut self, decl: NsDecl) -> Result<()> {
        let key = decl.key();
        if self.rendered.contains_key(&key) {
            return Err(Error::DuplicateNamespacePrefix(key));
        }
        self.rendered.insert(key, decl);
        Ok(())
    }

    /// Record a declaration as in scope but not written.
    pub fn add_unrendered(&mut self, decl: NsDecl) -> Result<()> {
        let key = decl.key();
        if self.unrendered.contains_key(&key) {
            return Err(Error::DuplicateNamespacePrefix(key));
        }
        self.unrendered.insert(key, decl);
        Ok(())
    }

    pub fn get_rendered(&self, key: &str) -> Option<&NsDecl> {
        self.rendered.get(key)
    }

    pub fn get_unrendered(&self, key: &str) -> Option<&NsDecl> {
        self.unrendered.get(key)
    }

    /// All unrendered declarations of this frame, in key order.
    pub fn all_unrendered(&self) -> impl Iterator<Item = &NsDecl> {
        self.unrendered.values()
    }
}

/// Stack of namespace frames. Depth 0 is the outermost tracked ancestor;
/// the last frame is the current element.
#[derive(Debug, Default)]
pub struct AncestorStack {
    frames: Vec<NsFrame>,
}

impl AncestorStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an empty frame. Must precede any frame mutation for the
    /// element being entered.
    pub fn enter_element_context(&mut self) {
        self.frames.push(NsFrame::default());
    }

    /// Pop the current frame.
    pub fn exit_element_context(&mut self) -> Result<()> {
        self.frames.pop().map(|_| ()).ok_or(Error::StackUnderflow)
    }

    /// Number of frames on the stack.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The frame at a given depth.
    pub fn frame_at(&self, depth: usize) -> Option<&NsFrame> {
        self.frames.get(depth)
    }

    /// The top frame.
    pub fn current_scope(&mut self) -> Result<&mut NsFrame> {
        self.frames.last_mut().ok_or(Error::StackUnderflow)
    }

    /// Nearest enclosing rendered declaration for a key, with its depth.
    pub fn find_nearest_rendered(&self, key: &str) -> Option<(&NsDecl, usize)> {
        for (depth, frame) in self.frames.iter().enumerate().rev() {
            if let Some(decl) = frame.get_rendered(key) {
                return Some((decl, depth));
            }
        }
        None
    }

    /// Nearest enclosing unrendered declaration for a key, with its depth.
    pub fn find_nearest_unrendered(&self, key: &str) -> Option<(&NsDecl, usize)> {
        for (depth, frame) in self.frames.iter().enumerate().rev() {
            if let Some(decl) = frame.get_unrendered(key) {
                return Some((decl, depth));
            }
        }
        None
    }

    /// Bulk-add declarations into the current frame's unrendered
    /// partition.
    pub fn load_unrendered_namespaces(&mut self, decls: BTreeMap<String, NsDecl>) -> Result<()> {
        let frame = self.current_scope()?;
        for (_, decl) in decls {
            frame.add_unrendered(decl)?;
        }
        Ok(())
    }

    /// Bulk-add declarations into the current frame's rendered
    /// partition. Also used to seed the context with namespaces rendered
    /// above a canonicalized subset's root, so descendants still detect
    /// redundancy.
    pub fn load_rendered_namespaces(&mut self, decls: &[NsDecl]) -> Result<()> {
        let frame = self.current_scope()?;
        for decl in decls {
            frame.add_rendered(decl.clone())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_prefix_rejected() {
        let mut frame = NsFrame::default();
        frame.add_rendered(NsDecl::namespace("x", "urn:a")).unwrap();
        let err = frame
            .add_rendered(NsDecl::namespace("x", "urn:b"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateNamespacePrefix(p) if p == "x"));

        // Partitions are independent: same prefix may be unrendered too.
        frame
            .add_unrendered(NsDecl::namespace("x", "urn:b"))
            .unwrap();
    }

    #[test]
    fn test_underflow() {
        let mut stack = AncestorStack::new();
        assert!(matches!(
            stack.exit_element_context(),
            Err(Error::StackUnderflow)
        ));
        stack.enter_element_context();
        stack.exit_element_context().unwrap();
        assert!(stack.exit_element_context().is_err());
    }

    #[test]
    fn test_nearest_lookup_prefers_deepest() {
        let mut stack = AncestorStack::new();
        stack.enter_element_context();
        stack
            .load_rendered_namespaces(&[NsDecl::namespace("x", "urn:outer")])
            .unwrap();
        stack.enter_element_context();
        stack
            .load_rendered_namespaces(&[NsDecl::namespace("x", "urn:inner")])
            .unwrap();

        let (decl, depth) = stack.find_nearest_rendered("x").unwrap();
        assert_eq!(decl.value, "urn:inner");
        assert_eq!(depth, 1);

        stack.exit_element_context().unwrap();
        let (decl, depth) = stack.find_nearest_rendered("x").unwrap();
        assert_eq!(decl.value, "urn:outer");
        assert_eq!(depth, 0);
        assert!(stack.find_nearest_rendered("y").is_none());
    }

    #[test]
    fn test_unrendered_partition_lookup() {
        let mut stack = AncestorStack::new();
        stack.enter_element_context();
        let mut decls = BTreeMap::new();
        let d = NsDecl::namespace("p", "urn:p");
        decls.insert(d.key(), d);
        stack.load_unrendered_namespaces(decls).unwrap();

        assert!(stack.find_nearest_rendered("p").is_none());
        let (decl, depth) = stack.find_nearest_unrendered("p").unwrap();
        assert_eq!(decl.value, "urn:p");
        assert_eq!(depth, 0);
    }
}

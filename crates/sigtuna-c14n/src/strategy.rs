#![forbid(unsafe_code)]

//! Namespace rendering policy, selected once per canonicalization pass.
//!
//! The dispatcher feeds every namespace declaration and `xml:` attribute
//! it encounters through the active strategy; on visible elements the
//! strategy then decides what must render so that all bindings in effect
//! stay unambiguous in the output.

use crate::render::{Attr, NsDecl};
use crate::stack::AncestorStack;
use sigtuna_core::{Error, Result};
use sigtuna_xml::Element;
use std::collections::BTreeMap;

/// Declarations a strategy has not yet classified for the current
/// element, keyed by [`NsDecl::key`]. Drained as decisions are made;
/// leftovers become the element frame's unrendered partition.
pub type LocalDecls = BTreeMap<String, NsDecl>;

/// Render lists under construction for one element.
#[derive(Debug, Default)]
pub struct RenderLists {
    pub namespaces: Vec<NsDecl>,
    pub attributes: Vec<Attr>,
}

impl RenderLists {
    /// Whether a declaration with this key was already selected, in
    /// either list.
    pub fn contains_key(&self, key: &str) -> bool {
        self.namespaces.iter().any(|d| d.key() == key)
            || self
                .attributes
                .iter()
                .any(|a| a.ns_uri == sigtuna_core::ns::XML && format!("xml:{}", a.local_name) == key)
    }
}

/// Insert into the undecided map, rejecting duplicate keys.
pub fn stash_local(local: &mut LocalDecls, decl: NsDecl) -> Result<()> {
    let key = decl.key();
    if local.insert(key.clone(), decl).is_some() {
        return Err(Error::DuplicateNamespacePrefix(key));
    }
    Ok(())
}

/// The shared non-redundancy rule.
///
/// A candidate must render unless the nearest rendered declaration for
/// its key already carries an identical value. `xmlns=""` is the inverse
/// case: it renders only to undeclare a non-empty default rendered
/// above.
pub fn is_non_redundant(candidate: &NsDecl, nearest_rendered: Option<&NsDecl>) -> bool {
    if candidate.is_empty_default() {
        matches!(nearest_rendered, Some(r) if !r.value.is_empty())
    } else {
        match nearest_rendered {
            None => true,
            Some(r) => r.value != candidate.value,
        }
    }
}

/// Fixed capability set of a canonicalization mode's namespace policy.
pub trait NamespaceStrategy {
    /// Classify a namespace declaration observed on the current element:
    /// render immediately or stash for an on-demand decision.
    fn track_namespace_node(
        &self,
        decl: NsDecl,
        lists: &mut RenderLists,
        local: &mut LocalDecls,
        stack: &AncestorStack,
    ) -> Result<()>;

    /// Classify an attribute in the `xml:` namespace observed on the
    /// current element.
    fn track_xml_namespace_node(
        &self,
        decl: NsDecl,
        lists: &mut RenderLists,
        local: &mut LocalDecls,
        stack: &AncestorStack,
    ) -> Result<()>;

    /// Given the element, the render lists so far, and the undecided
    /// local declarations, decide what else must render at this element.
    fn get_namespaces_to_render(
        &self,
        element: &Element,
        lists: &mut RenderLists,
        local: &mut LocalDecls,
        stack: &AncestorStack,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_redundant_rule() {
        let cand = NsDecl::namespace("x", "urn:x");
        assert!(is_non_redundant(&cand, None));
        assert!(is_non_redundant(
            &cand,
            Some(&NsDecl::namespace("x", "urn:other"))
        ));
        assert!(!is_non_redundant(
            &cand,
            Some(&NsDecl::namespace("x", "urn:x"))
        ));
    }

    #[test]
    fn test_empty_default_inverse_rule() {
        let undecl = NsDecl::namespace("", "");
        assert!(!is_non_redundant(&undecl, None));
        assert!(is_non_redundant(
            &undecl,
            Some(&NsDecl::namespace("", "urn:d"))
        ));
        assert!(!is_non_redundant(&undecl, Some(&NsDecl::namespace("", ""))));
    }

    #[test]
    fn test_stash_local_duplicate() {
        let mut local = LocalDecls::new();
        stash_local(&mut local, NsDecl::namespace("p", "urn:1")).unwrap();
        assert!(stash_local(&mut local, NsDecl::namespace("p", "urn:2")).is_err());
        // Distinct keyspace: xml:p does not collide with xmlns:p.
        stash_local(&mut local, NsDecl::xml_attribute("p", "v")).unwrap();
    }
}

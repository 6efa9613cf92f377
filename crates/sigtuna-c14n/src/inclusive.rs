#![forbid(unsafe_code)]

//! Plain Canonical XML 1.0 namespace policy.
//!
//! Algorithm URI: `http://www.w3.org/TR/2001/REC-xml-c14n-20010315`
//!
//! Every namespace binding in effect at a visible element renders
//! exactly once, at the point it first becomes necessary, and never when
//! an ancestor already rendered an identical binding. `xml:` attributes
//! follow the same nearest-declaration machinery so document subsets
//! inherit them from excluded ancestors.

use crate::render::NsDecl;
use crate::stack::AncestorStack;
use crate::strategy::{is_non_redundant, stash_local, LocalDecls, NamespaceStrategy, RenderLists};
use sigtuna_core::Result;
use sigtuna_xml::Element;

/// Plain C14N: every declaration decision is deferred to the element's
/// render pass.
#[derive(Debug, Default)]
pub struct InclusiveStrategy;

impl NamespaceStrategy for InclusiveStrategy {
    fn track_namespace_node(
        &self,
        decl: NsDecl,
        _lists: &mut RenderLists,
        local: &mut LocalDecls,
        _stack: &AncestorStack,
    ) -> Result<()> {
        stash_local(local, decl)
    }

    fn track_xml_namespace_node(
        &self,
        decl: NsDecl,
        _lists: &mut RenderLists,
        local: &mut LocalDecls,
        _stack: &AncestorStack,
    ) -> Result<()> {
        stash_local(local, decl)
    }

    fn get_namespaces_to_render(
        &self,
        _element: &Element,
        lists: &mut RenderLists,
        local: &mut LocalDecls,
        stack: &AncestorStack,
    ) -> Result<()> {
        // Locally declared candidates first. A redundant local stays in
        // the map and ends up unrendered on this element's frame.
        let keys: Vec<String> = local.keys().cloned().collect();
        for key in keys {
            let render = match local.get(&key) {
                Some(candidate) => {
                    let rendered = stack.find_nearest_rendered(&key);
                    is_non_redundant(candidate, rendered.map(|(d, _)| d))
                }
                None => false,
            };
            if render {
                if let Some(decl) = local.remove(&key) {
                    if decl.xml_attr {
                        lists.attributes.push(decl.to_attr());
                    } else {
                        lists.namespaces.push(decl);
                    }
                }
            }
        }

        // Then every binding still in effect from an enclosing scope:
        // walk all unrendered declarations, deepest frame first. A
        // binding renders when its nearest unrendered declaration sits
        // deeper than its nearest rendered one and is non-redundant
        // against it.
        for depth in (0..stack.depth()).rev() {
            let Some(frame) = stack.frame_at(depth) else {
                continue;
            };
            for decl in frame.all_unrendered() {
                let key = decl.key();
                if lists.contains_key(&key) || local.contains_key(&key) {
                    continue;
                }
                let rendered = stack.find_nearest_rendered(&key);
                let rendered_depth = rendered.map_or(-1, |(_, d)| d as i64);
                if let Some((candidate, unrendered_depth)) = stack.find_nearest_unrendered(&key) {
                    if (unrendered_depth as i64) > rendered_depth
                        && is_non_redundant(candidate, rendered.map(|(d, _)| d))
                    {
                        if candidate.xml_attr {
                            lists.attributes.push(candidate.to_attr());
                        } else {
                            lists.namespaces.push(candidate.clone());
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigtuna_xml::QName;
    use std::collections::BTreeMap;

    fn run(
        local_decls: &[(&str, &str)],
        stack: &AncestorStack,
    ) -> (RenderLists, LocalDecls) {
        let strategy = InclusiveStrategy;
        let mut lists = RenderLists::default();
        let mut local = LocalDecls::new();
        for (p, u) in local_decls {
            strategy
                .track_namespace_node(
                    NsDecl::namespace(p, u),
                    &mut lists,
                    &mut local,
                    stack,
                )
                .unwrap();
        }
        let element = Element::new(QName::local("e"));
        strategy
            .get_namespaces_to_render(&element, &mut lists, &mut local, stack)
            .unwrap();
        (lists, local)
    }

    #[test]
    fn test_local_declaration_renders_when_new() {
        let stack = AncestorStack::new();
        let (lists, local) = run(&[("x", "urn:x")], &stack);
        assert_eq!(lists.namespaces.len(), 1);
        assert_eq!(lists.namespaces[0].prefix, "x");
        assert!(local.is_empty());
    }

    #[test]
    fn test_identical_ancestor_rendering_suppresses_local() {
        let mut stack = AncestorStack::new();
        stack.enter_element_context();
        stack
            .load_rendered_namespaces(&[NsDecl::namespace("x", "urn:x")])
            .unwrap();

        let (lists, local) = run(&[("x", "urn:x")], &stack);
        assert!(lists.namespaces.is_empty());
        // The redundant local stays undecided for this frame.
        assert!(local.contains_key("x"));
    }

    #[test]
    fn test_in_effect_binding_renders_from_ancestor_frame() {
        let mut stack = AncestorStack::new();
        stack.enter_element_context();
        let mut decls = BTreeMap::new();
        let d = NsDecl::namespace("y", "urn:y");
        decls.insert(d.key(), d);
        stack.load_unrendered_namespaces(decls).unwrap();

        let (lists, _) = run(&[], &stack);
        assert_eq!(lists.namespaces.len(), 1);
        assert_eq!(lists.namespaces[0].prefix, "y");
    }

    #[test]
    fn test_rendered_binding_not_rerendered() {
        let mut stack = AncestorStack::new();
        stack.enter_element_context();
        stack
            .load_rendered_namespaces(&[NsDecl::namespace("y", "urn:y")])
            .unwrap();
        let mut decls = BTreeMap::new();
        let d = NsDecl::namespace("y", "urn:y");
        decls.insert(d.key(), d);
        stack.load_unrendered_namespaces(decls).unwrap();

        // Unrendered and rendered at the same depth: strict comparison
        // requires the unrendered one to sit strictly deeper.
        let (lists, _) = run(&[], &stack);
        assert!(lists.namespaces.is_empty());
    }

    #[test]
    fn test_xml_attribute_routes_to_attr_list() {
        let stack = AncestorStack::new();
        let strategy = InclusiveStrategy;
        let mut lists = RenderLists::default();
        let mut local = LocalDecls::new();
        strategy
            .track_xml_namespace_node(
                NsDecl::xml_attribute("lang", "en"),
                &mut lists,
                &mut local,
                &stack,
            )
            .unwrap();
        let element = Element::new(QName::local("e"));
        strategy
            .get_namespaces_to_render(&element, &mut lists, &mut local, &stack)
            .unwrap();
        assert!(lists.namespaces.is_empty());
        assert_eq!(lists.attributes.len(), 1);
        assert_eq!(lists.attributes[0].qualified_name, "xml:lang");
    }
}

#![forbid(unsafe_code)]

//! Exclusive Canonical XML 1.0 namespace policy.
//!
//! Algorithm URI: `http://www.w3.org/2001/10/xml-exc-c14n#`
//!
//! Only namespaces whose prefix is *visibly utilized* render: used by
//! the element's own name or by one of its rendered attributes. Unused
//! in-scope bindings never appear, no matter what plain C14N would do.
//! Prefixes named in the InclusiveNamespaces PrefixList are forced into
//! consideration whenever non-redundant, used or not; the reserved
//! `#default` token selects the default (empty) prefix. `xml:`
//! attributes are ordinary attributes here, with no inheritance.

use crate::render::NsDecl;
use crate::stack::AncestorStack;
use crate::strategy::{is_non_redundant, stash_local, LocalDecls, NamespaceStrategy, RenderLists};
use sigtuna_core::{ns, Result};
use sigtuna_xml::Element;
use std::collections::HashSet;

/// Exclusive C14N with a construction-time inclusive-prefix set.
#[derive(Debug, Default)]
pub struct ExclusiveStrategy {
    inclusive_prefixes: HashSet<String>,
}

impl ExclusiveStrategy {
    pub fn new(inclusive_prefixes: &[String]) -> Self {
        let inclusive_prefixes = inclusive_prefixes
            .iter()
            .map(|p| {
                if p == ns::DEFAULT_PREFIX_TOKEN {
                    String::new()
                } else {
                    p.clone()
                }
            })
            .collect();
        Self { inclusive_prefixes }
    }

    /// The shared redundancy check for one utilized prefix: prefer the
    /// local declaration; otherwise fall back to the nearest unrendered
    /// declaration when it sits strictly deeper than the nearest
    /// rendered one.
    fn render_prefix_if_needed(
        &self,
        prefix: &str,
        lists: &mut RenderLists,
        local: &mut LocalDecls,
        stack: &AncestorStack,
    ) -> Result<()> {
        if lists.contains_key(prefix) {
            return Ok(());
        }

        let render_local = match local.get(prefix) {
            Some(candidate) if !candidate.xml_attr => {
                let rendered = stack.find_nearest_rendered(prefix);
                is_non_redundant(candidate, rendered.map(|(d, _)| d))
            }
            _ => false,
        };
        if render_local {
            if let Some(decl) = local.remove(prefix) {
                lists.namespaces.push(decl);
            }
            return Ok(());
        }

        if !local.contains_key(prefix) {
            let rendered = stack.find_nearest_rendered(prefix);
            let rendered_depth = rendered.map_or(-1, |(_, d)| d as i64);
            if let Some((candidate, unrendered_depth)) = stack.find_nearest_unrendered(prefix) {
                if (unrendered_depth as i64) > rendered_depth
                    && is_non_redundant(candidate, rendered.map(|(d, _)| d))
                {
                    lists.namespaces.push(candidate.clone());
                }
            }
        }
        Ok(())
    }
}

impl NamespaceStrategy for ExclusiveStrategy {
    fn track_namespace_node(
        &self,
        decl: NsDecl,
        lists: &mut RenderLists,
        local: &mut LocalDecls,
        stack: &AncestorStack,
    ) -> Result<()> {
        // Inclusive-list prefixes render immediately when non-redundant;
        // everything else waits until usage is detected. A redundant
        // inclusive declaration is dropped outright.
        if !decl.is_empty_default() && self.inclusive_prefixes.contains(&decl.prefix) {
            let rendered = stack.find_nearest_rendered(&decl.key());
            if is_non_redundant(&decl, rendered.map(|(d, _)| d)) {
                lists.namespaces.push(decl);
            }
            return Ok(());
        }
        stash_local(local, decl)
    }

    fn track_xml_namespace_node(
        &self,
        decl: NsDecl,
        lists: &mut RenderLists,
        _local: &mut LocalDecls,
        _stack: &AncestorStack,
    ) -> Result<()> {
        // Exclusive C14N does not inherit xml: attributes; they render
        // on their own element like any other attribute.
        lists.attributes.push(decl.to_attr());
        Ok(())
    }

    fn get_namespaces_to_render(
        &self,
        element: &Element,
        lists: &mut RenderLists,
        local: &mut LocalDecls,
        stack: &AncestorStack,
    ) -> Result<()> {
        let element_prefix = element.name.prefix.clone().unwrap_or_default();
        self.render_prefix_if_needed(&element_prefix, lists, local, stack)?;

        let attr_prefixes: Vec<String> = lists
            .attributes
            .iter()
            .filter_map(|a| a.prefix().map(str::to_owned))
            .collect();
        for prefix in attr_prefixes {
            if prefix != "xml" {
                self.render_prefix_if_needed(&prefix, lists, local, stack)?;
            }
        }
        Ok(())
    }
}

#![forbid(unsafe_code)]

//! Loader: build an owned [`Document`] from XML text via roxmltree.
//!
//! roxmltree expands entity references and merges CDATA into text, so
//! parsed documents never contain `EntityReference` or `CData` nodes;
//! those kinds are produced by programmatic construction only. Text nodes
//! consisting entirely of XML whitespace are classified as `Whitespace`.

use crate::tree::{Attribute, Document, Element, NodeId, NodeKind, Pi, QName};
use sigtuna_core::{Error, Result};
use std::collections::BTreeMap;

impl Document {
    /// Parse XML text into an owned document tree.
    pub fn parse(text: &str) -> Result<Self> {
        let rdoc = roxmltree::Document::parse_with_options(text, crate::parsing_options())
            .map_err(|e| Error::XmlParse(e.to_string()))?;

        let mut doc = Document::new();
        let root = doc.root();
        for child in rdoc.root().children() {
            convert_node(&child, root, &mut doc, &BTreeMap::new());
        }
        Ok(doc)
    }
}

fn convert_node(
    rnode: &roxmltree::Node<'_, '_>,
    parent: NodeId,
    doc: &mut Document,
    parent_scope: &BTreeMap<String, String>,
) {
    match rnode.node_type() {
        roxmltree::NodeType::Element => {
            let scope = in_scope_namespaces(rnode);
            let elem = Element {
                name: element_name(rnode),
                attributes: rnode
                    .attributes()
                    .map(|a| Attribute {
                        name: QName {
                            prefix: attribute_prefix(rnode, &a),
                            local_name: a.name().to_owned(),
                            namespace_uri: a.namespace().map(str::to_owned),
                        },
                        value: a.value().to_owned(),
                    })
                    .collect(),
                namespace_declarations: local_declarations(parent_scope, &scope),
            };
            let id = doc.append_child(parent, NodeKind::Element(elem));
            for child in rnode.children() {
                convert_node(&child, id, doc, &scope);
            }
        }
        roxmltree::NodeType::Text => {
            let text = rnode.text().unwrap_or("");
            let kind = if is_xml_whitespace(text) {
                NodeKind::Whitespace(text.to_owned())
            } else {
                NodeKind::Text(text.to_owned())
            };
            doc.append_child(parent, kind);
        }
        roxmltree::NodeType::Comment => {
            doc.append_child(
                parent,
                NodeKind::Comment(rnode.text().unwrap_or("").to_owned()),
            );
        }
        roxmltree::NodeType::PI => {
            if let Some(pi) = rnode.pi() {
                doc.append_child(
                    parent,
                    NodeKind::ProcessingInstruction(Pi {
                        target: pi.target.to_owned(),
                        data: pi.value.map(str::to_owned),
                    }),
                );
            }
        }
        roxmltree::NodeType::Root => {}
    }
}

fn element_name(rnode: &roxmltree::Node<'_, '_>) -> QName {
    QName {
        prefix: element_prefix(rnode),
        local_name: rnode.tag_name().name().to_owned(),
        namespace_uri: rnode
            .tag_name()
            .namespace()
            .filter(|uri| !uri.is_empty())
            .map(str::to_owned),
    }
}

/// roxmltree exposes only expanded names, so the prefix as written is
/// recovered from the source text via byte ranges (the `positions`
/// feature, on by default).
fn element_prefix(rnode: &roxmltree::Node<'_, '_>) -> Option<String> {
    let input = rnode.document().input_text();
    let tag = &input[rnode.range()];
    let rest = &tag[1..];
    let end = rest
        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
        .unwrap_or(rest.len());
    qname_prefix(&rest[..end])
}

fn attribute_prefix(
    rnode: &roxmltree::Node<'_, '_>,
    attr: &roxmltree::Attribute<'_, '_>,
) -> Option<String> {
    let input = rnode.document().input_text();
    qname_prefix(&input[attr.range_qname()])
}

fn qname_prefix(qname: &str) -> Option<String> {
    qname.split_once(':').map(|(prefix, _)| prefix.to_owned())
}

/// Collect the in-scope namespace bindings at an element, excluding the
/// implicit `xml` prefix. roxmltree resolves scoping itself; an `xmlns=""`
/// undeclaration surfaces as a binding to the empty URI, which means "no
/// binding" and is dropped here so the scope diff recovers it.
fn in_scope_namespaces(rnode: &roxmltree::Node<'_, '_>) -> BTreeMap<String, String> {
    let mut result = BTreeMap::new();
    for ns in rnode.namespaces() {
        let prefix = ns.name().unwrap_or("");
        if prefix != "xml" && !ns.uri().is_empty() {
            result.insert(prefix.to_owned(), ns.uri().to_owned());
        }
    }
    result
}

/// The declarations written on an element are recovered by diffing its
/// in-scope bindings against its parent's. A binding present on the
/// parent but absent here becomes an undeclaration (empty URI). Identical
/// redeclarations are invisible to the diff; canonicalization eliminates
/// them as redundant anyway.
fn local_declarations(
    parent_scope: &BTreeMap<String, String>,
    scope: &BTreeMap<String, String>,
) -> Vec<(String, String)> {
    let mut decls = Vec::new();
    for (prefix, uri) in scope {
        if parent_scope.get(prefix) != Some(uri) {
            decls.push((prefix.clone(), uri.clone()));
        }
    }
    for prefix in parent_scope.keys() {
        if !scope.contains_key(prefix) {
            decls.push((prefix.clone(), String::new()));
        }
    }
    decls
}

fn is_xml_whitespace(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let doc = Document::parse(r#"<a><b attr="1">text</b></a>"#).unwrap();
        let b = doc.find_element(None, "b").unwrap();
        let elem = doc.element(b).unwrap();
        assert_eq!(elem.attributes.len(), 1);
        assert_eq!(elem.attributes[0].value, "1");
    }

    #[test]
    fn test_local_declarations_from_scope_diff() {
        let doc = Document::parse(r#"<a xmlns:x="urn:x"><x:b xmlns:y="urn:y"/></a>"#).unwrap();
        let a = doc.find_element(None, "a").unwrap();
        let b = doc.find_element(Some("urn:x"), "b").unwrap();

        let a_decls = &doc.element(a).unwrap().namespace_declarations;
        assert_eq!(a_decls, &[("x".to_owned(), "urn:x".to_owned())]);

        let b_decls = &doc.element(b).unwrap().namespace_declarations;
        assert_eq!(b_decls, &[("y".to_owned(), "urn:y".to_owned())]);
        assert_eq!(doc.element(b).unwrap().name.prefix.as_deref(), Some("x"));
    }

    #[test]
    fn test_default_namespace_undeclaration() {
        let doc = Document::parse(r#"<a xmlns="urn:a"><b xmlns=""><c/></b></a>"#).unwrap();
        let b = doc.find_element(None, "b").unwrap();
        let decls = &doc.element(b).unwrap().namespace_declarations;
        assert_eq!(decls, &[(String::new(), String::new())]);

        // Below the undeclaration nothing is declared again.
        let c = doc.find_element(None, "c").unwrap();
        assert!(doc.element(c).unwrap().namespace_declarations.is_empty());
    }

    #[test]
    fn test_whitespace_classification() {
        let doc = Document::parse("<a>\n  <b/>\n</a>").unwrap();
        let a = doc.find_element(None, "a").unwrap();
        let kinds: Vec<bool> = doc
            .children(a)
            .map(|id| matches!(doc.kind(id), Some(NodeKind::Whitespace(_))))
            .collect();
        assert_eq!(kinds, vec![true, false, true]);
    }

    #[test]
    fn test_parse_error() {
        assert!(Document::parse("<a><b></a>").is_err());
    }
}

#![forbid(unsafe_code)]

//! Render-list entry types and their total orders.
//!
//! Namespace nodes sort with the default declaration first, then by
//! prefix. Attributes sort by (namespace URI, local name) with
//! un-namespaced attributes first. Equal keys cannot occur within one
//! render list because prefixes are unique per frame.

use crate::escape;
use crate::output::CanonicalOutput;
use sigtuna_core::ns;
use sigtuna_xml::Attribute;

/// A namespace declaration pending or selected for rendering.
///
/// Attributes in the `xml:` namespace (`xml:lang`, `xml:space`,
/// `xml:base`) travel through the same frames under plain C14N, keyed by
/// local name, because document-subset canonicalization inherits them
/// from ancestors with the same nearest-declaration lookup. The
/// `xml_attr` flag records which kind this entry is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsDecl {
    /// Namespace prefix ("" for the default declaration), or the local
    /// name of an `xml:` attribute.
    pub prefix: String,
    /// Namespace URI, or the `xml:` attribute value.
    pub value: String,
    /// True when this entry is an `xml:` attribute rather than an
    /// `xmlns` declaration.
    pub xml_attr: bool,
}

impl NsDecl {
    /// An `xmlns` / `xmlns:prefix` declaration.
    pub fn namespace(prefix: &str, uri: &str) -> Self {
        Self {
            prefix: prefix.to_owned(),
            value: uri.to_owned(),
            xml_attr: false,
        }
    }

    /// An attribute in the `xml:` namespace.
    pub fn xml_attribute(local_name: &str, value: &str) -> Self {
        Self {
            prefix: local_name.to_owned(),
            value: value.to_owned(),
            xml_attr: true,
        }
    }

    /// The frame-partition key. `xml:` attributes get a distinct keyspace
    /// so `xml:lang` never collides with an `xmlns:lang` declaration.
    pub fn key(&self) -> String {
        if self.xml_attr {
            format!("xml:{}", self.prefix)
        } else {
            self.prefix.clone()
        }
    }

    /// True for `xmlns=""`: the undeclaration of the default namespace.
    pub fn is_empty_default(&self) -> bool {
        !self.xml_attr && self.prefix.is_empty() && self.value.is_empty()
    }

    /// Convert an `xml:` attribute entry into its attribute render form.
    pub fn to_attr(&self) -> Attr {
        Attr {
            ns_uri: ns::XML.to_owned(),
            local_name: self.prefix.clone(),
            qualified_name: format!("xml:{}", self.prefix),
            value: self.value.clone(),
        }
    }

    /// Serialize this declaration: ` xmlns="uri"` or ` xmlns:p="uri"`.
    pub fn write<O: CanonicalOutput + ?Sized>(&self, out: &mut O) {
        if self.prefix.is_empty() {
            out.write_str(" xmlns=\"");
        } else {
            out.write_str(" xmlns:");
            out.write_str(&self.prefix);
            out.write_str("=\"");
        }
        escape::escape_attr(&self.value, out);
        out.write_str("\"");
    }
}

impl Ord for NsDecl {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Default namespace (empty prefix) sorts first, then ordinal
        // prefix order.
        match (self.prefix.is_empty(), other.prefix.is_empty()) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => self.prefix.cmp(&other.prefix),
        }
    }
}

impl PartialOrd for NsDecl {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// An attribute selected for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// The namespace URI of the attribute ("" for no namespace).
    pub ns_uri: String,
    /// The local name.
    pub local_name: String,
    /// The qualified name (prefix:local or just local).
    pub qualified_name: String,
    /// The attribute value.
    pub value: String,
}

impl Attr {
    pub fn from_attribute(attr: &Attribute) -> Self {
        Self {
            ns_uri: attr.name.namespace_uri.clone().unwrap_or_default(),
            local_name: attr.name.local_name.clone(),
            qualified_name: attr.name.qualified(),
            value: attr.value.clone(),
        }
    }

    /// The prefix part of the qualified name, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.qualified_name.split_once(':').map(|(p, _)| p)
    }

    /// Serialize this attribute: ` name="escaped-value"`.
    pub fn write<O: CanonicalOutput + ?Sized>(&self, out: &mut O) {
        out.write_str(" ");
        out.write_str(&self.qualified_name);
        out.write_str("=\"");
        escape::escape_attr(&self.value, out);
        out.write_str("\"");
    }
}

impl Ord for Attr {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Attributes with no namespace come before those with one; then
        // (namespace URI, local name), both ordinal.
        match (self.ns_uri.is_empty(), other.ns_uri.is_empty()) {
            (true, true) => self.local_name.cmp(&other.local_name),
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            (false, false) => self
                .ns_uri
                .cmp(&other.ns_uri)
                .then(self.local_name.cmp(&other.local_name)),
        }
    }
}

impl PartialOrd for Attr {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered_ns(d: &NsDecl) -> String {
        let mut out = Vec::new();
        d.write(&mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_ns_decl_render() {
        assert_eq!(
            rendered_ns(&NsDecl::namespace("", "urn:a")),
            r#" xmlns="urn:a""#
        );
        assert_eq!(
            rendered_ns(&NsDecl::namespace("x", "urn:x")),
            r#" xmlns:x="urn:x""#
        );
    }

    #[test]
    fn test_ns_order_default_first() {
        let mut decls = vec![
            NsDecl::namespace("b", "urn:b"),
            NsDecl::namespace("", "urn:d"),
            NsDecl::namespace("a", "urn:a"),
        ];
        decls.sort();
        let prefixes: Vec<&str> = decls.iter().map(|d| d.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["", "a", "b"]);
    }

    #[test]
    fn test_attr_order() {
        let mk = |ns: &str, local: &str| Attr {
            ns_uri: ns.to_owned(),
            local_name: local.to_owned(),
            qualified_name: local.to_owned(),
            value: String::new(),
        };
        let mut attrs = vec![mk("urn:b", "a"), mk("", "z"), mk("urn:a", "b"), mk("", "a")];
        attrs.sort();
        let keys: Vec<(&str, &str)> = attrs
            .iter()
            .map(|a| (a.ns_uri.as_str(), a.local_name.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![("", "a"), ("", "z"), ("urn:a", "b"), ("urn:b", "a")]
        );
    }

    #[test]
    fn test_attr_value_escaping() {
        let a = Attr {
            ns_uri: String::new(),
            local_name: "v".to_owned(),
            qualified_name: "v".to_owned(),
            value: "a&b\"c\td".to_owned(),
        };
        let mut out = Vec::new();
        a.write(&mut out);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#" v="a&amp;b&quot;c&#x9;d""#
        );
    }

    #[test]
    fn test_xml_attr_keyspace() {
        let lang = NsDecl::xml_attribute("lang", "en");
        let ns_lang = NsDecl::namespace("lang", "urn:lang");
        assert_ne!(lang.key(), ns_lang.key());
        assert_eq!(lang.to_attr().qualified_name, "xml:lang");
    }
}

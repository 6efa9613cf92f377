#![forbid(unsafe_code)]

//! XML document abstraction for the Sigtuna canonicalization library.
//!
//! Provides an owned, arena-backed document tree whose node kinds carry
//! everything the canonicalizer needs (element/attribute names with prefix
//! and namespace URI, whitespace classification, processing instructions,
//! entity references), plus the `NodeSet` inclusion predicate used for
//! document-subset canonicalization.
//!
//! Parsing is a thin loader over `roxmltree`; node-set *selection* (XPath
//! and friends) belongs to the layer above and is not part of this crate.

pub mod load;
pub mod nodeset;
pub mod tree;

pub use nodeset::NodeSet;
pub use tree::{Attribute, Document, Element, NodeId, NodeKind, Pi, QName};

/// Return roxmltree parsing options that allow DTD.
///
/// DTD is allowed because roxmltree does not expand external entities or
/// perform entity substitution beyond the five predefined XML entities,
/// so it is safe. Many canonicalization test vectors use DTDs for entity
/// definitions.
pub fn parsing_options() -> roxmltree::ParsingOptions {
    roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    }
}

#![forbid(unsafe_code)]

//! XML Canonicalization (C14N) for the Sigtuna XML security library.
//!
//! Implements the two canonicalization families used by XML digital
//! signatures:
//! - Canonical XML 1.0 (with and without comments)
//! - Exclusive Canonical XML 1.0 (with and without comments)
//!
//! Canonicalization serializes an XML node-set into one unique byte
//! sequence, so a digest or signature computed over it is reproducible
//! despite attribute reordering, namespace-prefix redeclaration, and
//! other semantically neutral variation. Verification must reproduce the
//! signer's exact bytes; any error from this crate means the document
//! cannot be trusted.

pub mod escape;
pub mod exclusive;
pub mod inclusive;
pub mod nodes;
pub mod output;
pub mod render;
pub mod stack;
pub mod strategy;

use exclusive::ExclusiveStrategy;
use inclusive::InclusiveStrategy;
use nodes::Canonicalizer;
use output::{CanonicalOutput, DigestOutput};
use sigtuna_core::{algorithm, Result};
use sigtuna_xml::{Document, NodeSet};

/// The canonicalization mode. Immutable per pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum C14nMode {
    /// Canonical XML 1.0
    Inclusive,
    /// Canonical XML 1.0 with comments
    InclusiveWithComments,
    /// Exclusive Canonical XML 1.0
    Exclusive,
    /// Exclusive Canonical XML 1.0 with comments
    ExclusiveWithComments,
}

impl C14nMode {
    /// Get the algorithm URI for this mode.
    pub fn uri(&self) -> &'static str {
        match self {
            Self::Inclusive => algorithm::C14N,
            Self::InclusiveWithComments => algorithm::C14N_WITH_COMMENTS,
            Self::Exclusive => algorithm::EXC_C14N,
            Self::ExclusiveWithComments => algorithm::EXC_C14N_WITH_COMMENTS,
        }
    }

    /// Parse a C14N mode from an algorithm URI.
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            algorithm::C14N => Some(Self::Inclusive),
            algorithm::C14N_WITH_COMMENTS => Some(Self::InclusiveWithComments),
            algorithm::EXC_C14N => Some(Self::Exclusive),
            algorithm::EXC_C14N_WITH_COMMENTS => Some(Self::ExclusiveWithComments),
            _ => None,
        }
    }

    pub fn with_comments(&self) -> bool {
        matches!(self, Self::InclusiveWithComments | Self::ExclusiveWithComments)
    }

    pub fn is_exclusive(&self) -> bool {
        matches!(self, Self::Exclusive | Self::ExclusiveWithComments)
    }
}

/// Split an InclusiveNamespaces `PrefixList` value into prefixes.
/// The reserved `#default` token is kept verbatim; the exclusive
/// strategy maps it to the empty prefix.
pub fn parse_prefix_list(list: &str) -> Vec<String> {
    list.split_whitespace().map(str::to_owned).collect()
}

/// Canonicalize a document (or a node-set within it) to bytes.
///
/// - `node_set`: `None` canonicalizes the whole document; `Some` selects
///   a document subset computed by the caller.
/// - `inclusive_prefixes`: for exclusive C14N, the InclusiveNamespaces
///   PrefixList; ignored by the plain modes.
pub fn canonicalize(
    doc: &Document,
    mode: C14nMode,
    node_set: Option<&NodeSet>,
    inclusive_prefixes: &[String],
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_canonical(doc, mode, node_set, inclusive_prefixes, &mut out)?;
    Ok(out)
}

/// Canonicalize straight into a caller-owned hash context.
///
/// The bytes fed to the hasher are exactly those [`canonicalize`] would
/// return, without materializing the canonical form.
pub fn canonicalize_into_digest(
    doc: &Document,
    mode: C14nMode,
    node_set: Option<&NodeSet>,
    inclusive_prefixes: &[String],
    hasher: &mut dyn digest::Update,
) -> Result<()> {
    let mut out = DigestOutput::new(hasher);
    write_canonical(doc, mode, node_set, inclusive_prefixes, &mut out)
}

/// Convenience: parse XML text, then canonicalize the whole document.
pub fn canonicalize_xml(xml: &str, mode: C14nMode, inclusive_prefixes: &[String]) -> Result<Vec<u8>> {
    let doc = Document::parse(xml)?;
    canonicalize(&doc, mode, None, inclusive_prefixes)
}

fn write_canonical<O: CanonicalOutput>(
    doc: &Document,
    mode: C14nMode,
    node_set: Option<&NodeSet>,
    inclusive_prefixes: &[String],
    out: &mut O,
) -> Result<()> {
    if mode.is_exclusive() {
        Canonicalizer::new(doc, node_set, mode, ExclusiveStrategy::new(inclusive_prefixes))
            .write_document(out)
    } else {
        Canonicalizer::new(doc, node_set, mode, InclusiveStrategy).write_document(out)
    }
}

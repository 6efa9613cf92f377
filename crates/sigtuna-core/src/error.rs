#![forbid(unsafe_code)]

/// Errors produced by the Sigtuna XML canonicalization library.
///
/// Canonicalization is a pure function of (tree, node-set, mode), so no
/// error here is retryable. Callers producing or verifying signatures must
/// treat any error as "this document cannot be trusted" and never use
/// partial output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// A node the canonicalizer does not recognize reached the dispatcher,
    /// or the tree shape violates the document model.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Two declarations for the same prefix were added to a single
    /// namespace-frame partition. This is an upstream invariant violation,
    /// not a property of any well-formed document.
    #[error("duplicate namespace prefix in scope: {0}")]
    DuplicateNamespacePrefix(String),

    /// An element context was exited with no matching entry.
    #[error("namespace context stack underflow")]
    StackUnderflow,

    /// Anything operational that is not a property of the document
    /// itself, such as an unreadable input file.
    #[error("canonicalization error: {0}")]
    Canonicalization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

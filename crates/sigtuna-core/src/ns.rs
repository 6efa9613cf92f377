#![forbid(unsafe_code)]

//! XML namespace constants used across the library.

/// XML namespace (bound to the `xml` prefix in every document)
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

/// XMLNS namespace (namespace declaration attributes)
pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";

/// XML Digital Signature namespace
pub const DSIG: &str = "http://www.w3.org/2000/09/xmldsig#";

/// Exclusive C14N namespace (InclusiveNamespaces element)
pub const EXC_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";

/// Reserved token in an exclusive-C14N `PrefixList` that selects the
/// default (empty) prefix.
pub const DEFAULT_PREFIX_TOKEN: &str = "#default";

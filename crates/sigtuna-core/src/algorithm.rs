#![forbid(unsafe_code)]

//! W3C algorithm identifier URIs.

/// Canonical XML 1.0
pub const C14N: &str = "http://www.w3.org/TR/2001/REC-xml-c14n-20010315";

/// Canonical XML 1.0 with comments
pub const C14N_WITH_COMMENTS: &str =
    "http://www.w3.org/TR/2001/REC-xml-c14n-20010315#WithComments";

/// Exclusive Canonical XML 1.0
pub const EXC_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";

/// Exclusive Canonical XML 1.0 with comments
pub const EXC_C14N_WITH_COMMENTS: &str = "http://www.w3.org/2001/10/xml-exc-c14n#WithComments";

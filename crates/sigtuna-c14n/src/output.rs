#![forbid(unsafe_code)]

//! Output sinks for canonical bytes.
//!
//! The canonical form is serialized once; the sink decides whether the
//! bytes land in a growable buffer (for signature generation or
//! embedding) or stream into a running digest (for verifying large
//! documents without materializing the form). Both sinks observe the
//! exact same byte sequence by construction.

use digest::Update;

/// Destination for canonical output.
pub trait CanonicalOutput {
    fn write_bytes(&mut self, data: &[u8]);

    fn write_str(&mut self, data: &str) {
        self.write_bytes(data.as_bytes());
    }
}

impl CanonicalOutput for Vec<u8> {
    fn write_bytes(&mut self, data: &[u8]) {
        self.extend_from_slice(data);
    }
}

/// Adapter that feeds canonical bytes into a caller-owned hash context.
pub struct DigestOutput<'a> {
    hasher: &'a mut dyn Update,
}

impl<'a> DigestOutput<'a> {
    pub fn new(hasher: &'a mut dyn Update) -> Self {
        Self { hasher }
    }
}

impl CanonicalOutput for DigestOutput<'_> {
    fn write_bytes(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }
}

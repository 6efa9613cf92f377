#![forbid(unsafe_code)]

//! Shared types and constants for the Sigtuna XML canonicalization library.

pub mod algorithm;
pub mod error;
pub mod ns;

pub use error::{Error, Result};

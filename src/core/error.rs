//! Errors raised while reading decimal-coded identifiers.

use thiserror::Error;

/// A stored or transmitted identifier did not name a known variant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("'{input}' is not a decimal {kind} id")]
    NotDecimal { kind: &'static str, input: String },

    #[error("{id} is not a known {kind} id")]
    Unknown { kind: &'static str, id: u64 },
}

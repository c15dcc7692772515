//! Payload decoding errors.

use crate::core::ParseError;
use thiserror::Error;

/// An incoming callback payload could not be decoded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("payload '{payload}' does not start with a transition id: {source}")]
    Transition {
        payload: String,
        #[source]
        source: ParseError,
    },
}

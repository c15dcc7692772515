//! Errors raised while rendering a state.

use crate::collab::{MessengerError, StoreError};
use thiserror::Error;

/// Errors that can occur in [`Handler::enter_state`](super::Handler::enter_state).
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("delivery failed: {0}")]
    Messenger(#[from] MessengerError),

    #[error("storage failed: {0}")]
    Store(#[from] StoreError),

    #[error("render failed: {0}")]
    Render(String),
}

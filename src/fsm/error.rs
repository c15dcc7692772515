//! Errors raised by the finite state machine.

use crate::collab::StoreError;
use crate::core::{State, Transition};
use thiserror::Error;

/// Failure of the injected commit callback.
#[derive(Debug, Error)]
pub enum CommitError {
    #[error("state store write failed: {0}")]
    Store(#[from] StoreError),

    #[error("commit refused: {0}")]
    Refused(String),
}

/// Errors that can occur when firing an event.
#[derive(Debug, Error)]
pub enum FsmError {
    #[error("Transition {transition:?} rejected from state {from:?}")]
    Rejected { from: State, transition: Transition },

    #[error("{0:?} re-renders the current state and cannot be fired")]
    Refresh(Transition),

    #[error("Commit of {from:?} -> {to:?} failed: {source}")]
    Commit {
        from: State,
        to: State,
        #[source]
        source: CommitError,
    },
}

impl FsmError {
    /// The move was legal but could not be recorded.
    pub fn is_commit_failure(&self) -> bool {
        matches!(self, Self::Commit { .. })
    }
}

//! Build errors for transition tables.

use crate::core::Transition;
use thiserror::Error;

/// Errors that can occur when building a transition table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("No edges defined. Add at least one edge")]
    NoEdges,

    #[error("{0:?} re-renders the current state and cannot be given an edge")]
    RefreshEdge(Transition),

    #[error("Transition {0:?} is declared more than once")]
    DuplicateTransition(Transition),

    #[error("Transition {0:?} has an empty source set. Use .wildcard() for any-state edges")]
    EmptySources(Transition),
}

//! Builder for constructing transition tables.

use super::error::BuildError;
use super::{Edge, Sources, TransitionTable};
use crate::core::{State, Transition};
use std::collections::{BTreeMap, BTreeSet};

/// Builder for declaring the conversation graph with a fluent API.
///
/// # Example
///
/// ```
/// use chatflow::core::{State, Transition};
/// use chatflow::table::TransitionTableBuilder;
///
/// let table = TransitionTableBuilder::new()
///     .edge(Transition::EmptyToNewUser, [State::Empty], State::NewUser)
///     .wildcard(Transition::Reset, State::Empty)
///     .build()
///     .unwrap();
///
/// assert!(table.permits(State::Empty, Transition::EmptyToNewUser).is_some());
/// assert!(table.permits(State::NewUser, Transition::Reset).is_some());
/// ```
#[derive(Debug, Default)]
pub struct TransitionTableBuilder {
    edges: Vec<Edge>,
}

impl TransitionTableBuilder {
    pub fn new() -> Self {
        Self { edges: Vec::new() }
    }

    /// Declare an edge legal from any of `sources`.
    pub fn edge<I>(mut self, transition: Transition, sources: I, dest: State) -> Self
    where
        I: IntoIterator<Item = State>,
    {
        self.edges.push(Edge {
            transition,
            sources: Sources::Only(sources.into_iter().collect::<BTreeSet<_>>()),
            dest,
        });
        self
    }

    /// Declare an edge legal from every state.
    pub fn wildcard(mut self, transition: Transition, dest: State) -> Self {
        self.edges.push(Edge {
            transition,
            sources: Sources::Any,
            dest,
        });
        self
    }

    /// Validate the declared edges and freeze them into a table.
    pub fn build(self) -> Result<TransitionTable, BuildError> {
        if self.edges.is_empty() {
            return Err(BuildError::NoEdges);
        }

        let mut edges = BTreeMap::new();
        for edge in self.edges {
            if edge.transition.is_refresh() {
                return Err(BuildError::RefreshEdge(edge.transition));
            }
            if matches!(&edge.sources, Sources::Only(set) if set.is_empty()) {
                return Err(BuildError::EmptySources(edge.transition));
            }
            if edges.contains_key(&edge.transition) {
                return Err(BuildError::DuplicateTransition(edge.transition));
            }
            edges.insert(edge.transition, edge);
        }

        Ok(TransitionTable { edges })
    }
}

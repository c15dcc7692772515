//! The transition table: which named transitions are legal from which states.
//!
//! The table is graph-as-data. Each real transition owns exactly one
//! [`Edge`] naming its legal sources (a set of states, or every state) and
//! its destination. `Loop` and `Error` never have edges; they re-render the
//! current state and are intercepted before the table is consulted.
//!
//! Tables are built once through [`TransitionTableBuilder`] and are
//! immutable afterwards. [`TransitionTable::standard`] is the process-wide
//! conversation graph.

mod builder;
mod error;

pub use builder::TransitionTableBuilder;
pub use error::BuildError;

use crate::core::{State, Transition};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Ordered set of transition names.
pub type TransitionSet = BTreeSet<Transition>;

/// States from which an edge may be taken.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sources {
    /// Legal from every state.
    Any,
    /// Legal only from the listed states.
    Only(BTreeSet<State>),
}

impl Sources {
    pub fn contains(&self, state: State) -> bool {
        match self {
            Self::Any => true,
            Self::Only(states) => states.contains(&state),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Any)
    }
}

/// A declared edge of the conversation graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub transition: Transition,
    pub sources: Sources,
    pub dest: State,
}

/// Immutable mapping from transition name to its edge.
#[derive(Clone, Debug)]
pub struct TransitionTable {
    edges: BTreeMap<Transition, Edge>,
}

static STANDARD: Lazy<Arc<TransitionTable>> = Lazy::new(|| {
    Arc::new(
        standard_graph()
            .build()
            .expect("standard conversation graph should always build"),
    )
});

impl TransitionTable {
    pub fn builder() -> TransitionTableBuilder {
        TransitionTableBuilder::new()
    }

    /// The shared conversation graph.
    pub fn standard() -> Arc<TransitionTable> {
        Arc::clone(&STANDARD)
    }

    /// The edge declared for `transition`, if any.
    pub fn edge(&self, transition: Transition) -> Option<&Edge> {
        self.edges.get(&transition)
    }

    /// Destination of `transition` when taken from `from`, or `None` when the
    /// move is not legal.
    pub fn permits(&self, from: State, transition: Transition) -> Option<State> {
        self.edge(transition)
            .filter(|edge| edge.sources.contains(from))
            .map(|edge| edge.dest)
    }

    /// Every transition legal from `state`, wildcard edges included.
    pub fn available(&self, state: State) -> TransitionSet {
        self.edges
            .values()
            .filter(|edge| edge.sources.contains(state))
            .map(|edge| edge.transition)
            .collect()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

fn standard_graph() -> TransitionTableBuilder {
    use State as S;
    use Transition as T;

    TransitionTableBuilder::new()
        .edge(T::EmptyToNewUser, [S::Empty], S::NewUser)
        .edge(T::NewUserToSelectRole, [S::NewUser], S::SelectRole)
        .edge(T::SelectRoleToMainMenu, [S::SelectRole], S::MainMenu)
        .edge(T::MainMenuToSelectRole, [S::MainMenu], S::SelectRole)
        .edge(T::MainMenuToAbout, [S::MainMenu], S::About)
        .edge(T::MainMenuToApplications, [S::MainMenu], S::Applications)
        .edge(T::MainMenuToEvents, [S::MainMenu], S::Events)
        .edge(T::MainMenuToPersonalEvents, [S::MainMenu], S::PersonalEvents)
        .edge(T::MainMenuToVerifications, [S::MainMenu], S::Verifications)
        .edge(T::PersonalEventsToEvents, [S::PersonalEvents], S::Events)
        .edge(T::VerificationsToVerification, [S::Verifications], S::Verification)
        .edge(T::VerificationToVerifications, [S::Verification], S::Verifications)
        .edge(
            T::VerificationToReplyVerification,
            [S::Verification],
            S::ReplyVerification,
        )
        .edge(
            T::ReplyVerificationToVerification,
            [S::ReplyVerification],
            S::Verification,
        )
        .edge(
            T::VerificationToEditVerification,
            [S::Verification],
            S::EditVerification,
        )
        .edge(
            T::EditVerificationToVerification,
            [S::EditVerification],
            S::Verification,
        )
        .edge(T::EventsToCategoriesFilter, [S::Events], S::CategoriesFilter)
        .edge(T::CategoriesFilterToEvents, [S::CategoriesFilter], S::Events)
        .edge(T::EventsToGeoFilter, [S::Events], S::GeoFilter)
        .edge(T::GeoFilterToEvents, [S::GeoFilter], S::Events)
        .edge(T::EventsToMainMenu, [S::Events], S::MainMenu)
        .edge(T::EventsToPersonalEvents, [S::Events], S::PersonalEvents)
        .edge(T::GeoFilterToEditGeoFilter, [S::GeoFilter], S::EditGeoFilter)
        .edge(T::EditGeoFilterToGeoFilter, [S::EditGeoFilter], S::GeoFilter)
        .edge(T::EventsToEvent, [S::Events], S::Event)
        .edge(T::EventToEvents, [S::Event], S::Events)
        .wildcard(T::Reset, S::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_builds() {
        let table = TransitionTable::standard();
        assert_eq!(table.len(), 27);
    }

    #[test]
    fn standard_table_is_shared() {
        assert!(Arc::ptr_eq(
            &TransitionTable::standard(),
            &TransitionTable::standard()
        ));
    }

    #[test]
    fn every_real_transition_has_an_edge() {
        let table = TransitionTable::standard();
        for transition in Transition::ALL {
            assert_eq!(
                table.edge(*transition).is_some(),
                !transition.is_refresh(),
                "{transition:?}"
            );
        }
    }

    #[test]
    fn edge_names_match_endpoints() {
        let table = TransitionTable::standard();
        for edge in table.edges().filter(|e| !e.sources.is_wildcard()) {
            let Sources::Only(sources) = &edge.sources else {
                unreachable!()
            };
            let name = edge.transition.name();
            let (from, to) = name.split_once("To").unwrap();
            assert!(sources.iter().any(|s| s.name() == from), "{name}");
            assert_eq!(edge.dest.name(), to, "{name}");
        }
    }

    #[test]
    fn available_includes_reset_everywhere() {
        let table = TransitionTable::standard();
        for state in State::ALL {
            let available = table.available(*state);
            assert!(available.contains(&Transition::Reset), "{state:?}");
            assert!(!available.contains(&Transition::Loop));
            assert!(!available.contains(&Transition::Error));
        }
    }

    #[test]
    fn available_from_main_menu() {
        let available = TransitionTable::standard().available(State::MainMenu);
        let expected: TransitionSet = [
            Transition::MainMenuToSelectRole,
            Transition::MainMenuToAbout,
            Transition::MainMenuToApplications,
            Transition::MainMenuToEvents,
            Transition::MainMenuToPersonalEvents,
            Transition::MainMenuToVerifications,
            Transition::Reset,
        ]
        .into_iter()
        .collect();
        assert_eq!(available, expected);
    }

    #[test]
    fn permits_checks_source_set() {
        let table = TransitionTable::standard();
        assert_eq!(
            table.permits(State::MainMenu, Transition::MainMenuToEvents),
            Some(State::Events)
        );
        assert_eq!(
            table.permits(State::Events, Transition::MainMenuToEvents),
            None
        );
        assert_eq!(
            table.permits(State::Verification, Transition::Reset),
            Some(State::Empty)
        );
        assert_eq!(table.permits(State::Events, Transition::Loop), None);
    }
}

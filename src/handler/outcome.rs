//! What a handler decided, and why a state is being rendered.

use crate::core::Transition;
use crate::payload::Params;

/// Result of interpreting one update in the current state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Move along `transition`, handing `params` to the next state.
    Move {
        transition: Transition,
        params: Params,
    },
    /// Stay and re-render the current state with `params`.
    Stay { params: Params },
    /// The input is not valid here. `message`, when present, is shown to
    /// the user before the current state is re-rendered.
    Reject {
        params: Params,
        message: Option<String>,
    },
}

impl Outcome {
    pub fn moving(transition: Transition) -> Self {
        Self::Move {
            transition,
            params: Params::new(),
        }
    }

    pub fn stay() -> Self {
        Self::Stay {
            params: Params::new(),
        }
    }

    pub fn reject(message: impl Into<String>) -> Self {
        Self::Reject {
            params: Params::new(),
            message: Some(message.into()),
        }
    }

    /// The transition this outcome corresponds to on the wire.
    pub fn transition(&self) -> Transition {
        match self {
            Self::Move { transition, .. } => *transition,
            Self::Stay { .. } => Transition::Loop,
            Self::Reject { .. } => Transition::Error,
        }
    }

    pub fn params(&self) -> &Params {
        match self {
            Self::Move { params, .. } | Self::Stay { params } | Self::Reject { params, .. } => {
                params
            }
        }
    }

    /// Fold a `Move` along `Loop` or `Error` into `Stay` or `Reject`.
    pub fn normalize(self) -> Self {
        match self {
            Self::Move {
                transition: Transition::Loop,
                params,
            } => Self::Stay { params },
            Self::Move {
                transition: Transition::Error,
                params,
            } => Self::Reject {
                params,
                message: None,
            },
            other => other,
        }
    }
}

/// Why a state is being rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arrival {
    /// The user just arrived along this edge.
    Via(Transition),
    /// Re-render after a `Stay`.
    Loop,
    /// Re-render after a `Reject`.
    Error,
}

impl Arrival {
    /// `true` when the state is being re-rendered in place.
    pub fn is_refresh(self) -> bool {
        matches!(self, Self::Loop | Self::Error)
    }

    pub fn transition(self) -> Transition {
        match self {
            Self::Via(transition) => transition,
            Self::Loop => Transition::Loop,
            Self::Error => Transition::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_pseudo_moves() {
        assert_eq!(Outcome::moving(Transition::Loop).normalize(), Outcome::stay());
        assert_eq!(
            Outcome::moving(Transition::Error).normalize(),
            Outcome::Reject {
                params: Params::new(),
                message: None
            }
        );
        assert_eq!(
            Outcome::moving(Transition::Reset).normalize(),
            Outcome::moving(Transition::Reset)
        );
    }

    #[test]
    fn outcome_maps_to_wire_transition() {
        assert_eq!(Outcome::stay().transition(), Transition::Loop);
        assert_eq!(Outcome::reject("no").transition(), Transition::Error);
        assert_eq!(
            Outcome::moving(Transition::MainMenuToAbout).transition(),
            Transition::MainMenuToAbout
        );
    }

    #[test]
    fn arrival_refresh() {
        assert!(Arrival::Loop.is_refresh());
        assert!(Arrival::Error.is_refresh());
        assert!(!Arrival::Via(Transition::Reset).is_refresh());
        assert_eq!(Arrival::Error.transition(), Transition::Error);
    }
}

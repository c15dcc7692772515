//! Record of committed moves.
//!
//! An FSM keeps the moves it committed so callers can inspect what happened
//! while handling one update. The log lives in memory only.

use super::state::State;
use super::transition::Transition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One committed move along an edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommittedMove {
    /// The state being left
    pub from: State,
    /// The state being entered
    pub to: State,
    /// The edge that was taken
    pub via: Transition,
    /// When the commit landed
    pub timestamp: DateTime<Utc>,
}

/// Ordered log of committed moves.
///
/// The log is immutable; [`record`](MoveLog::record) returns a new log with
/// the move appended.
///
/// # Example
///
/// ```rust
/// use chatflow::core::{CommittedMove, MoveLog, State, Transition};
/// use chrono::Utc;
///
/// let log = MoveLog::new().record(CommittedMove {
///     from: State::Empty,
///     to: State::NewUser,
///     via: Transition::EmptyToNewUser,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(log.get_path(), vec![State::Empty, State::NewUser]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MoveLog {
    moves: Vec<CommittedMove>,
}

impl MoveLog {
    pub fn new() -> Self {
        Self { moves: Vec::new() }
    }

    /// Record a move, returning a new log.
    pub fn record(&self, committed: CommittedMove) -> Self {
        let mut moves = self.moves.clone();
        moves.push(committed);
        Self { moves }
    }

    /// States traversed: the first source, then every destination.
    pub fn get_path(&self) -> Vec<State> {
        let mut path = Vec::with_capacity(self.moves.len() + 1);
        if let Some(first) = self.moves.first() {
            path.push(first.from);
        }
        path.extend(self.moves.iter().map(|m| m.to));
        path
    }

    /// Time between the first and the last commit.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.moves.first()?, self.moves.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn moves(&self) -> &[CommittedMove] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

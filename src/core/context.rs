//! The durable per-user conversation cursor.

use super::error::ParseError;
use super::state::State;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a chat user, as assigned by the messaging platform.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Which state one user is in, exactly as persisted.
///
/// The state is kept in its stored decimal form; [`current_state`] decodes
/// it. Contexts are created at first contact in [`State::Empty`] and are only
/// changed by a successful commit.
///
/// [`current_state`]: ConversationContext::current_state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    pub user_id: UserId,
    pub state: String,
}

impl ConversationContext {
    /// A context for a user observed for the first time.
    pub fn new(user_id: UserId) -> Self {
        Self::at(user_id, State::INITIAL)
    }

    /// A context positioned at `state`.
    pub fn at(user_id: UserId, state: State) -> Self {
        Self {
            user_id,
            state: state.to_string(),
        }
    }

    /// Decode the persisted state string.
    pub fn current_state(&self) -> Result<State, ParseError> {
        self.state.parse()
    }
}

//! The standard interpretation protocol for button-driven states.
//!
//! Most states only accept presses of the buttons they rendered. For those,
//! [`interpret_callback`] performs every validity check in a fixed order:
//!
//! 1. free text is rejected,
//! 2. a payload that does not decode is rejected,
//! 3. a decoded `Loop` stays in place with its parameters,
//! 4. a transition that is not available from the current state is
//!    rejected (stale or forged button),
//! 5. anything else is a move.
//!
//! Every rejection carries a user-facing message; the router shows it and
//! re-renders the current state.

use super::outcome::Outcome;
use crate::core::Transition;
use crate::payload;
use crate::table::TransitionSet;
use crate::update::{Update, UpdateKind};

/// Shown when free text arrives where a button press was expected.
pub const INVALID_ANSWER: &str = "Invalid answer";

/// Shown when a callback payload cannot be decoded.
pub const INVALID_CALLBACK: &str = "Invalid callback";

/// Shown when a decoded transition is not available here.
pub const USE_BUTTONS: &str = "Invalid answer, please use the buttons";

/// Interpret a button press against the transitions available from the
/// current state.
///
/// # Example
///
/// ```rust
/// use chatflow::core::{State, Transition, UserId};
/// use chatflow::handler::{interpret_callback, Outcome};
/// use chatflow::table::TransitionTable;
/// use chatflow::update::Update;
///
/// let available = TransitionTable::standard().available(State::MainMenu);
///
/// let pressed = Update::callback(UserId(1), "4");
/// assert_eq!(
///     interpret_callback(&pressed, &available),
///     Outcome::moving(Transition::MainMenuToAbout)
/// );
///
/// let stale = Update::callback(UserId(1), "12?id=3");
/// assert!(matches!(interpret_callback(&stale, &available), Outcome::Reject { .. }));
/// ```
pub fn interpret_callback(update: &Update, available: &TransitionSet) -> Outcome {
    let payload = match &update.kind {
        UpdateKind::Callback { payload, .. } => payload,
        UpdateKind::Message { .. } => return Outcome::reject(INVALID_ANSWER),
    };

    let decoded = match payload::decode(payload) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::debug!(user_id = %update.user_id, error = %err, "Undecodable callback");
            return Outcome::reject(INVALID_CALLBACK);
        }
    };

    match decoded.transition {
        Transition::Loop => Outcome::Stay {
            params: decoded.params,
        },
        transition if transition == Transition::Error || !available.contains(&transition) => {
            Outcome::reject(USE_BUTTONS)
        }
        transition => Outcome::Move {
            transition,
            params: decoded.params,
        },
    }
}

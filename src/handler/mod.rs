//! The per-state handler contract.
//!
//! Each conversation state owns one [`Handler`] with two steps:
//!
//! - **`leave_state`** interprets an inbound update in the current state and
//!   returns an [`Outcome`]: move along an edge, stay and re-render, or
//!   reject the input with a message.
//! - **`enter_state`** renders a state. The [`Arrival`] tells it whether the
//!   user just arrived along an edge or the state is being re-rendered.
//!
//! Handlers are expected to return only moves that are available from the
//! current state, so the user gets a meaningful message for stale buttons.
//! The FSM enforces legality again regardless. [`interpret_callback`]
//! implements the standard checks for button-driven states and
//! [`ParamRules`] validates payload parameters.

mod builtin;
mod error;
mod outcome;
mod protocol;
mod registry;
mod rules;

pub use builtin::{EntryHandler, MenuHandler};
pub use error::HandlerError;
pub use outcome::{Arrival, Outcome};
pub use protocol::{interpret_callback, INVALID_ANSWER, INVALID_CALLBACK, USE_BUTTONS};
pub use registry::HandlerRegistry;
pub use rules::{ParamCheck, ParamRules, ParamViolation};

use crate::payload::Params;
use crate::table::TransitionSet;
use crate::update::Update;
use async_trait::async_trait;

/// Strategy that renders and interprets one conversation state.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Render the state.
    async fn enter_state(
        &self,
        update: &Update,
        arrival: Arrival,
        params: &Params,
    ) -> Result<(), HandlerError>;

    /// Interpret `update`. `available` lists the transitions legal from the
    /// current state; `Stay` may be returned regardless of it.
    async fn leave_state(&self, update: &Update, available: &TransitionSet) -> Outcome;
}

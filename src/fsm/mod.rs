//! Finite state machine for one conversation.
//!
//! This module is the effectful shell around the transition table:
//!
//! - **Legality** is pure: an event is legal iff its edge lists the current
//!   state as a source, or is wildcard-sourced.
//! - **Recording** is injected: the [`Commit`] callback persists the move,
//!   and the machine only advances once it succeeds.
//!
//! A machine lives for the duration of one update; the durable position is
//! whatever the commit callback wrote.

mod commit;
mod error;
mod machine;

pub use commit::Commit;
pub use error::{CommitError, FsmError};
pub use machine::Fsm;

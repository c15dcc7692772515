//! Core conversation types.
//!
//! This module contains the pure vocabulary of the dispatch engine:
//! - Conversation states and named transitions, both decimal-coded
//! - The per-user conversation context
//! - The in-memory log of committed moves
//!
//! Nothing in this module performs I/O.

mod context;
mod error;
mod history;
pub mod macros;
mod state;
mod transition;

pub use context::{ConversationContext, UserId};
pub use error::ParseError;
pub use history::{CommittedMove, MoveLog};
pub use state::State;
pub use transition::Transition;

//! Chatflow: conversation-state dispatch for button-driven chat bots
//!
//! Every user has a persisted conversation state. Inbound updates (button
//! callbacks or free text) move the user along a fixed graph of named
//! transitions, and each state owns a handler that renders its prompt and
//! interprets the next input.
//!
//! Chatflow keeps legality checks pure and pushes effects to the edges: the
//! transition table and FSM decide whether a move is allowed, while storage
//! and message delivery are injected collaborators.
//!
//! # Core Concepts
//!
//! - **State / Transition**: closed enums serialized as decimal strings
//! - **Transition table**: immutable graph with wildcard-sourced edges
//! - **FSM**: commits one legal move through an injected callback
//! - **Payload codec**: carries a transition and its parameters through a
//!   button round trip
//! - **Handler**: per-state render and interpret steps
//! - **Router**: sequences handler calls around FSM commits
//!
//! # Example
//!
//! ```rust
//! use chatflow::collab::memory::{MemoryMessenger, MemoryUserStore};
//! use chatflow::core::{ConversationContext, State, Transition, UserId};
//! use chatflow::handler::{EntryHandler, HandlerRegistry, MenuHandler};
//! use chatflow::message::{Button, Keyboard};
//! use chatflow::router::Router;
//! use chatflow::update::Update;
//! use std::sync::Arc;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let store = Arc::new(MemoryUserStore::new().with_user(UserId(7), State::Empty));
//! let messenger = Arc::new(MemoryMessenger::new());
//!
//! let handlers = HandlerRegistry::new()
//!     .register(State::Empty, EntryHandler::new(Transition::EmptyToNewUser))
//!     .register(
//!         State::NewUser,
//!         MenuHandler::new(messenger.clone(), "Welcome!").keyboard(
//!             Keyboard::new().button(Button::new("Continue", Transition::NewUserToSelectRole)),
//!         ),
//!     );
//!
//! let router = Router::new(handlers, store.clone(), messenger.clone());
//! let mut user = ConversationContext::at(UserId(7), State::Empty);
//! router.route_update(&mut user, &Update::message(UserId(7), "/start")).await;
//!
//! assert_eq!(user.current_state(), Ok(State::NewUser));
//! assert_eq!(messenger.texts_for(UserId(7)), vec!["Welcome!"]);
//! # });
//! ```

pub mod collab;
pub mod core;
pub mod dispatch;
pub mod fsm;
pub mod handler;
pub mod message;
pub mod payload;
pub mod router;
pub mod table;
pub mod update;

#[doc(hidden)]
pub use serde as __serde;

// Re-export commonly used types
pub use core::{ConversationContext, State, Transition, UserId};
pub use dispatch::{DispatchConfig, Dispatcher};
pub use fsm::{Commit, Fsm};
pub use handler::{Arrival, Handler, HandlerRegistry, Outcome};
pub use payload::{Params, Payload};
pub use router::Router;
pub use table::TransitionTable;
pub use update::Update;

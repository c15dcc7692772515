//! Routes one inbound update through handlers and the state machine.
//!
//! For each update the router:
//!
//! 1. reads the user's current state from the persisted string,
//! 2. binds an [`Fsm`] to a commit callback that writes through the
//!    [`UserStore`],
//! 3. asks the current state's handler to interpret the update,
//! 4. re-renders in place for `Stay` and `Reject`, or fires the move and
//!    renders the destination state.
//!
//! At most one state write happens per update. Nothing is rendered after a
//! failed move.

use crate::collab::{Messenger, UserStore};
use crate::core::{ConversationContext, ParseError, State, Transition, UserId};
use crate::fsm::{Commit, CommitError, Fsm, FsmError};
use crate::handler::{Arrival, Handler, HandlerError, HandlerRegistry, Outcome};
use crate::message::OutgoingMessage;
use crate::payload::Params;
use crate::table::TransitionTable;
use crate::update::Update;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::Instrument;

/// Why an update was dropped.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("stored state '{state}' is unreadable: {source}")]
    UnreadableState {
        state: String,
        #[source]
        source: ParseError,
    },

    #[error("no handler registered for state {0:?}")]
    NoHandler(State),

    #[error(transparent)]
    Transition(#[from] FsmError),

    #[error("rendering {state:?} failed: {source}")]
    Render {
        state: State,
        #[source]
        source: HandlerError,
    },
}

/// What happened to a routed update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Routed {
    Moved {
        from: State,
        to: State,
        via: Transition,
    },
    Stayed {
        state: State,
    },
    Rejected {
        state: State,
        message: Option<String>,
    },
}

impl Routed {
    /// State the user is in after routing.
    pub fn state(&self) -> State {
        match self {
            Self::Moved { to, .. } => *to,
            Self::Stayed { state } | Self::Rejected { state, .. } => *state,
        }
    }
}

/// Sequences handler calls around FSM commits.
///
/// Read-only after construction; share it behind an `Arc` across tasks.
pub struct Router {
    handlers: HandlerRegistry,
    store: Arc<dyn UserStore>,
    messenger: Arc<dyn Messenger>,
    table: Arc<TransitionTable>,
}

impl Router {
    /// Create a router over the standard conversation graph.
    pub fn new(
        handlers: HandlerRegistry,
        store: Arc<dyn UserStore>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self::with_table(handlers, store, messenger, TransitionTable::standard())
    }

    pub fn with_table(
        handlers: HandlerRegistry,
        store: Arc<dyn UserStore>,
        messenger: Arc<dyn Messenger>,
        table: Arc<TransitionTable>,
    ) -> Self {
        let missing = handlers.missing();
        if !missing.is_empty() {
            tracing::warn!(?missing, "States without a handler; their updates will be dropped");
        }
        Self {
            handlers,
            store,
            messenger,
            table,
        }
    }

    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Route `update` for `user`, logging any failure.
    ///
    /// Never fails: a fault with one update must not stall the caller's
    /// update loop. `user.state` reflects the committed state afterwards.
    pub async fn route_update(&self, user: &mut ConversationContext, update: &Update) {
        let span = tracing::info_span!(
            "route_update",
            user_id = %user.user_id,
            update_id = %update.id,
        );

        async {
            match self.dispatch(user, update).await {
                Ok(routed) => tracing::debug!(?routed, "Update routed"),
                Err(err @ RouteError::NoHandler(_)) => {
                    tracing::error!(error = %err, "Dropping update: handler registry incomplete")
                }
                Err(err) => tracing::warn!(error = %err, "Dropping update"),
            }
        }
        .instrument(span)
        .await
    }

    /// Route `update` for `user`, returning what happened.
    pub async fn dispatch(
        &self,
        user: &mut ConversationContext,
        update: &Update,
    ) -> Result<Routed, RouteError> {
        let current = user
            .current_state()
            .map_err(|source| RouteError::UnreadableState {
                state: user.state.clone(),
                source,
            })?;

        let user_id = user.user_id;
        let commit = StoreCommit {
            store: self.store.as_ref(),
            user: user_id,
            state: &mut user.state,
        };
        let mut fsm = Fsm::with_table(&self.table, current, commit);

        let handler = self.handler_for(current)?;
        let outcome = handler
            .leave_state(update, &fsm.available_transitions())
            .await
            .normalize();

        match outcome {
            Outcome::Stay { params } => {
                render(handler, current, update, Arrival::Loop, &params).await?;
                Ok(Routed::Stayed { state: current })
            }
            Outcome::Reject { params, message } => {
                if let Some(text) = &message {
                    self.notify(user_id, text).await;
                }
                render(handler, current, update, Arrival::Error, &params).await?;
                Ok(Routed::Rejected {
                    state: current,
                    message,
                })
            }
            Outcome::Move { transition, params } => {
                let to = fsm.event(transition).await?;
                let next = self.handler_for(to)?;
                render(next, to, update, Arrival::Via(transition), &params).await?;
                Ok(Routed::Moved {
                    from: current,
                    to,
                    via: transition,
                })
            }
        }
    }

    fn handler_for(&self, state: State) -> Result<&dyn Handler, RouteError> {
        self.handlers.get(state).ok_or(RouteError::NoHandler(state))
    }

    async fn notify(&self, user: UserId, text: &str) {
        if let Err(err) = self.messenger.send(user, OutgoingMessage::text(text)).await {
            tracing::warn!(error = %err, "Failed to deliver rejection message");
        }
    }
}

async fn render(
    handler: &dyn Handler,
    state: State,
    update: &Update,
    arrival: Arrival,
    params: &Params,
) -> Result<(), RouteError> {
    handler
        .enter_state(update, arrival, params)
        .await
        .map_err(|source| RouteError::Render { state, source })
}

/// Commit callback writing the destination through the store and mirroring
/// the stored value into the in-memory context.
struct StoreCommit<'a> {
    store: &'a dyn UserStore,
    user: UserId,
    state: &'a mut String,
}

#[async_trait]
impl Commit for StoreCommit<'_> {
    async fn commit(&mut self, dest: State) -> Result<(), CommitError> {
        let wanted = dest.to_string();
        let stored = self.store.set_state(self.user, &wanted).await?;
        if stored != wanted {
            tracing::warn!(wanted = %wanted, stored = %stored, "Store echoed a different state");
        }
        *self.state = stored;
        Ok(())
    }
}

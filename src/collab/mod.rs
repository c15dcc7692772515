//! External collaborators the dispatch core talks to.
//!
//! Persistence and message delivery live outside this crate. The router and
//! handlers reach them only through these narrow traits, so any backend
//! (SQL table, key-value store, bot API client) can be plugged in.
//! [`memory`] provides in-process implementations.

pub mod memory;

use crate::core::{ConversationContext, State, UserId};
use crate::message::OutgoingMessage;
use crate::update::Sender;
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a [`UserStore`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("user {0} not found")]
    NotFound(UserId),

    #[error("storage backend failed: {0}")]
    Backend(String),
}

/// Errors reported by a [`Messenger`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessengerError {
    #[error("message delivery failed: {0}")]
    Transport(String),

    #[error("message {0} cannot be edited")]
    NotEditable(String),
}

/// Durable per-user state storage.
///
/// States are exchanged in their decimal string form.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// The persisted state string for `user`.
    async fn get_state(&self, user: UserId) -> Result<String, StoreError>;

    /// Persist `state` for `user`, returning the stored value.
    async fn set_state(&self, user: UserId, state: &str) -> Result<String, StoreError>;

    /// Register a user seen for the first time.
    async fn create(
        &self,
        user: UserId,
        sender: &Sender,
        state: &str,
    ) -> Result<ConversationContext, StoreError>;

    /// Load the context for `user`, creating it in the initial state on
    /// first contact.
    async fn get_or_create(
        &self,
        user: UserId,
        sender: &Sender,
    ) -> Result<ConversationContext, StoreError> {
        match self.get_state(user).await {
            Ok(state) => Ok(ConversationContext {
                user_id: user,
                state,
            }),
            Err(StoreError::NotFound(_)) => {
                let created = self
                    .create(user, sender, &State::INITIAL.to_string())
                    .await?;
                tracing::info!(
                    user_id = %user,
                    username = sender.username.as_deref().unwrap_or(""),
                    "Created new user"
                );
                Ok(created)
            }
            Err(err) => Err(err),
        }
    }
}

/// Delivers rendered content to users.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a new message.
    async fn send(&self, user: UserId, message: OutgoingMessage) -> Result<(), MessengerError>;

    /// Replace the content of a message sent earlier.
    async fn edit(
        &self,
        user: UserId,
        message_id: &str,
        message: OutgoingMessage,
    ) -> Result<(), MessengerError>;
}

//! In-process collaborators for tests, demos and single-node bots.

use super::{Messenger, MessengerError, StoreError, UserStore};
use crate::core::{ConversationContext, State, UserId};
use crate::message::OutgoingMessage;
use crate::update::Sender;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Clone, Debug)]
struct StoredUser {
    state: String,
    sender: Sender,
}

/// Concurrent in-memory [`UserStore`].
///
/// Writes are last-writer-wins, like a plain `UPDATE ... SET state = ?`.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: DashMap<UserId, StoredUser>,
    writes: AtomicUsize,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user positioned at `state`.
    pub fn with_user(self, user: UserId, state: State) -> Self {
        self.users.insert(
            user,
            StoredUser {
                state: state.to_string(),
                sender: Sender::default(),
            },
        );
        self
    }

    /// Seed a user with a raw stored state string.
    pub fn with_raw_state(self, user: UserId, state: impl Into<String>) -> Self {
        self.users.insert(
            user,
            StoredUser {
                state: state.into(),
                sender: Sender::default(),
            },
        );
        self
    }

    /// The stored state string for `user`.
    pub fn state_of(&self, user: UserId) -> Option<String> {
        self.users.get(&user).map(|u| u.state.clone())
    }

    /// The profile recorded when `user` was created.
    pub fn sender_of(&self, user: UserId) -> Option<Sender> {
        self.users.get(&user).map(|u| u.sender.clone())
    }

    /// Number of successful `set_state` calls.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_state(&self, user: UserId) -> Result<String, StoreError> {
        self.state_of(user).ok_or(StoreError::NotFound(user))
    }

    async fn set_state(&self, user: UserId, state: &str) -> Result<String, StoreError> {
        let mut stored = self.users.get_mut(&user).ok_or(StoreError::NotFound(user))?;
        stored.state = state.to_string();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(stored.state.clone())
    }

    async fn create(
        &self,
        user: UserId,
        sender: &Sender,
        state: &str,
    ) -> Result<ConversationContext, StoreError> {
        let stored = self
            .users
            .entry(user)
            .or_insert_with(|| StoredUser {
                state: state.to_string(),
                sender: sender.clone(),
            });
        Ok(ConversationContext {
            user_id: user,
            state: stored.state.clone(),
        })
    }
}

/// One message handed to a [`MemoryMessenger`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub user: UserId,
    /// Set when an existing message was edited instead of a new one sent.
    pub edited: Option<String>,
    pub message: OutgoingMessage,
}

/// [`Messenger`] that records every delivery.
#[derive(Debug, Default)]
pub struct MemoryMessenger {
    deliveries: Mutex<Vec<Delivery>>,
}

impl MemoryMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, oldest first.
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.lock().clone()
    }

    /// Texts delivered to `user`, oldest first.
    pub fn texts_for(&self, user: UserId) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|d| d.user == user)
            .map(|d| d.message.text.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Delivery>> {
        self.deliveries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Messenger for MemoryMessenger {
    async fn send(&self, user: UserId, message: OutgoingMessage) -> Result<(), MessengerError> {
        self.lock().push(Delivery {
            user,
            edited: None,
            message,
        });
        Ok(())
    }

    async fn edit(
        &self,
        user: UserId,
        message_id: &str,
        message: OutgoingMessage,
    ) -> Result<(), MessengerError> {
        self.lock().push(Delivery {
            user,
            edited: Some(message_id.to_string()),
            message,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_or_create_defaults_to_empty() {
        let store = MemoryUserStore::new();
        let sender = Sender {
            username: Some("ann".to_string()),
            name: "Ann".to_string(),
        };

        let ctx = store.get_or_create(UserId(1), &sender).await.unwrap();

        assert_eq!(ctx.current_state(), Ok(State::Empty));
        assert_eq!(store.sender_of(UserId(1)), Some(sender.clone()));
        assert_eq!(store.writes(), 0);

        store.set_state(UserId(1), "3").await.unwrap();
        let again = store.get_or_create(UserId(1), &sender).await.unwrap();
        assert_eq!(again.current_state(), Ok(State::MainMenu));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn set_state_requires_existing_user() {
        let store = MemoryUserStore::new();
        assert_eq!(
            store.set_state(UserId(9), "1").await,
            Err(StoreError::NotFound(UserId(9)))
        );
    }

    #[tokio::test]
    async fn set_state_counts_writes() {
        let store = MemoryUserStore::new().with_user(UserId(2), State::Events);
        let stored = store.set_state(UserId(2), "9").await.unwrap();

        assert_eq!(stored, "9");
        assert_eq!(store.writes(), 1);
        assert_eq!(store.get_state(UserId(2)).await.unwrap(), "9");
    }

    #[tokio::test]
    async fn messenger_records_sends_and_edits() {
        let messenger = MemoryMessenger::new();
        messenger
            .send(UserId(3), OutgoingMessage::text("hello"))
            .await
            .unwrap();
        messenger
            .edit(UserId(3), "m-1", OutgoingMessage::text("menu"))
            .await
            .unwrap();

        let deliveries = messenger.deliveries();
        assert_eq!(deliveries.len(), 2);
        assert_eq!(deliveries[1].edited.as_deref(), Some("m-1"));
        assert_eq!(messenger.texts_for(UserId(3)), vec!["hello", "menu"]);
        assert!(messenger.texts_for(UserId(4)).is_empty());
    }
}

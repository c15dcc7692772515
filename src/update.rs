//! Inbound updates delivered by the messaging transport.

use crate::core::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who sent an update, as reported by the platform.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub username: Option<String>,
    pub name: String,
}

/// What the user did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpdateKind {
    /// A button was pressed. `payload` is the string the payload codec
    /// produced when the button was rendered.
    Callback {
        payload: String,
        message_id: Option<String>,
    },
    /// Free text was typed.
    Message { text: String },
}

/// One inbound update for one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    /// Locally assigned id used to correlate log records.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub user_id: UserId,
    #[serde(default)]
    pub sender: Sender,
    pub kind: UpdateKind,
}

impl Update {
    pub fn callback(user_id: UserId, payload: impl Into<String>) -> Self {
        Self::new(
            user_id,
            UpdateKind::Callback {
                payload: payload.into(),
                message_id: None,
            },
        )
    }

    pub fn message(user_id: UserId, text: impl Into<String>) -> Self {
        Self::new(user_id, UpdateKind::Message { text: text.into() })
    }

    fn new(user_id: UserId, kind: UpdateKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            sender: Sender::default(),
            kind,
        }
    }

    pub fn with_sender(mut self, sender: Sender) -> Self {
        self.sender = sender;
        self
    }

    /// Attach the id of the message whose button was pressed.
    pub fn in_message(mut self, id: impl Into<String>) -> Self {
        if let UpdateKind::Callback { message_id, .. } = &mut self.kind {
            *message_id = Some(id.into());
        }
        self
    }

    /// The callback payload, if this update is a button press.
    pub fn payload(&self) -> Option<&str> {
        match &self.kind {
            UpdateKind::Callback { payload, .. } => Some(payload.as_str()),
            UpdateKind::Message { .. } => None,
        }
    }

    /// The typed text, if this update is a message.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            UpdateKind::Message { text } => Some(text.as_str()),
            UpdateKind::Callback { .. } => None,
        }
    }

    /// The message a callback came from, so a render can edit it in place.
    pub fn source_message(&self) -> Option<&str> {
        match &self.kind {
            UpdateKind::Callback { message_id, .. } => message_id.as_deref(),
            UpdateKind::Message { .. } => None,
        }
    }
}

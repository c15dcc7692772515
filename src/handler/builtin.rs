//! Reusable handlers.

use super::outcome::{Arrival, Outcome};
use super::protocol::interpret_callback;
use super::rules::ParamRules;
use super::{Handler, HandlerError};
use crate::collab::{Messenger, MessengerError};
use crate::core::Transition;
use crate::message::{Keyboard, OutgoingMessage};
use crate::payload::Params;
use crate::table::TransitionSet;
use crate::update::Update;
use async_trait::async_trait;
use std::sync::Arc;

/// Moves along one fixed edge whatever the input, and renders nothing.
///
/// Used for pass-through states such as `Empty`, where any first contact
/// starts the onboarding flow.
#[derive(Clone, Copy, Debug)]
pub struct EntryHandler {
    transition: Transition,
}

impl EntryHandler {
    pub fn new(transition: Transition) -> Self {
        Self { transition }
    }
}

#[async_trait]
impl Handler for EntryHandler {
    async fn enter_state(
        &self,
        _update: &Update,
        _arrival: Arrival,
        _params: &Params,
    ) -> Result<(), HandlerError> {
        Ok(())
    }

    async fn leave_state(&self, _update: &Update, _available: &TransitionSet) -> Outcome {
        Outcome::moving(self.transition)
    }
}

/// A static menu: one text and a keyboard of buttons.
///
/// Renders by editing the message whose button was pressed, or by sending a
/// new message when the update was typed text or the pressed message can no
/// longer be edited. Interprets input with the standard callback protocol,
/// then applies its [`ParamRules`].
pub struct MenuHandler {
    messenger: Arc<dyn Messenger>,
    text: String,
    keyboard: Keyboard,
    rules: ParamRules,
}

impl MenuHandler {
    pub fn new(messenger: Arc<dyn Messenger>, text: impl Into<String>) -> Self {
        Self {
            messenger,
            text: text.into(),
            keyboard: Keyboard::new(),
            rules: ParamRules::new(),
        }
    }

    pub fn keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = keyboard;
        self
    }

    pub fn rules(mut self, rules: ParamRules) -> Self {
        self.rules = rules;
        self
    }

    fn render(&self) -> OutgoingMessage {
        OutgoingMessage::text(self.text.clone()).with_keyboard(self.keyboard.clone())
    }
}

#[async_trait]
impl Handler for MenuHandler {
    async fn enter_state(
        &self,
        update: &Update,
        _arrival: Arrival,
        _params: &Params,
    ) -> Result<(), HandlerError> {
        let Some(message_id) = update.source_message() else {
            self.messenger.send(update.user_id, self.render()).await?;
            return Ok(());
        };

        match self
            .messenger
            .edit(update.user_id, message_id, self.render())
            .await
        {
            Err(MessengerError::NotEditable(_)) => {
                tracing::debug!(message_id, "Message not editable; sending a new one");
                self.messenger.send(update.user_id, self.render()).await?;
            }
            other => other?,
        }
        Ok(())
    }

    async fn leave_state(&self, update: &Update, available: &TransitionSet) -> Outcome {
        self.rules.apply(interpret_callback(update, available))
    }
}

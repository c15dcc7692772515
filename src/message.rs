//! Outgoing messages and inline keyboards.
//!
//! Every button carries a payload produced by the payload codec, so the
//! press comes back to the router as a decodable transition.

use crate::core::Transition;
use crate::payload::{Params, Payload};
use serde::{Deserialize, Serialize};

/// One inline button.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub payload: String,
}

impl Button {
    /// A button that fires `transition` with no parameters.
    pub fn new(label: impl Into<String>, transition: Transition) -> Self {
        Self::with_payload(label, &Payload::new(transition))
    }

    /// A button that fires `transition` with `params`.
    pub fn with_params(label: impl Into<String>, transition: Transition, params: Params) -> Self {
        Self::with_payload(label, &Payload::with_params(transition, params))
    }

    pub fn with_payload(label: impl Into<String>, payload: &Payload) -> Self {
        Self {
            label: label.into(),
            payload: payload.encode(),
        }
    }
}

/// Rows of inline buttons.
///
/// # Example
///
/// ```rust
/// use chatflow::core::Transition;
/// use chatflow::message::{Button, Keyboard};
/// use chatflow::payload::Payload;
///
/// let keyboard = Keyboard::new()
///     .button(Button::new("About", Transition::MainMenuToAbout))
///     .row(vec![
///         Button::with_payload("<<", &Payload::new(Transition::Loop).with_param("page", "1")),
///         Button::with_payload(">>", &Payload::new(Transition::Loop).with_param("page", "3")),
///     ]);
///
/// assert_eq!(keyboard.rows().len(), 2);
/// assert_eq!(keyboard.rows()[1][1].payload, "22?page=3");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Append a row holding a single button.
    pub fn button(self, button: Button) -> Self {
        self.row(vec![button])
    }

    /// Append a row of buttons. Empty rows are skipped.
    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        if !buttons.is_empty() {
            self.rows.push(buttons);
        }
        self
    }

    pub fn rows(&self) -> &[Vec<Button>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every payload on the keyboard, row by row.
    pub fn payloads(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(|b| b.payload.as_str())
    }
}

/// Rendered content for one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = (!keyboard.is_empty()).then_some(keyboard);
        self
    }
}

use serde::Serialize;
use serde_json::{Value, json};

use crate::errors::BotError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentActionButtonOptions {
    pub name: String,
    pub text: String,
    /// Echoed back in the click callback.
    pub value: String,
    /// Text that replaces the button once clicked.
    pub replace_text: Option<String>,
    pub border_color: Option<String>,
    pub text_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentActionButton {
    #[serde(rename = "type")]
    kind: &'static str,
    name: String,
    text: String,
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    replace_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text_color: Option<String>,
}

impl AttachmentActionButton {
    #[must_use]
    pub fn new(options: AttachmentActionButtonOptions) -> Self {
        Self {
            kind: "button",
            name: options.name,
            text: options.text,
            value: options.value,
            replace_text: options.replace_text,
            border_color: options.border_color,
            text_color: options.text_color,
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentOptions {
    /// Identifies the attachment in button click callbacks.
    pub callback_id: String,
    pub actions: Vec<AttachmentActionButton>,
}

/// Interactive button row attached to a text or markdown message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    callback_id: String,
    actions: Vec<AttachmentActionButton>,
}

impl Attachment {
    /// # Errors
    ///
    /// Returns `BotError::InvalidMessage` when no action buttons are given.
    pub fn new(options: AttachmentOptions) -> Result<Self, BotError> {
        if options.actions.is_empty() {
            return Err(BotError::InvalidMessage(format!(
                "attachment '{}' requires at least one action",
                options.callback_id
            )));
        }

        Ok(Self {
            callback_id: options.callback_id,
            actions: options.actions,
        })
    }

    #[must_use]
    pub fn callback_id(&self) -> &str {
        &self.callback_id
    }

    #[must_use]
    pub fn actions(&self) -> &[AttachmentActionButton] {
        &self.actions
    }

    /// Payload embedded in a host message's `attachments` array. An
    /// attachment is never posted on its own, so it is not a [`super::Message`].
    #[must_use]
    pub fn to_send_object(&self) -> Value {
        json!({
            "callback_id": self.callback_id,
            "actions": self.actions,
        })
    }
}

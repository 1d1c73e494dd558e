use serde_json::{Value, json};

use super::{Message, Target, envelope};
use crate::errors::BotError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageImageOptions {
    /// Base64 of the raw image bytes.
    pub base64: Option<String>,
    /// Hex MD5 of the raw image bytes (not of the base64 text).
    pub md5: Option<String>,
    pub chat_id: Option<String>,
    pub visible_to_user: Vec<String>,
}

impl MessageImageOptions {
    /// Shallow merge: every field set in `overrides` replaces the one in `self`.
    #[must_use]
    pub fn merged_with(self, overrides: MessageImageOptions) -> Self {
        let visible_to_user = if overrides.visible_to_user.is_empty() {
            self.visible_to_user
        } else {
            overrides.visible_to_user
        };

        Self {
            base64: overrides.base64.or(self.base64),
            md5: overrides.md5.or(self.md5),
            chat_id: overrides.chat_id.or(self.chat_id),
            visible_to_user,
        }
    }
}

/// Image message carrying the image inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageImage {
    base64: String,
    md5: String,
    target: Target,
}

impl MessageImage {
    /// # Errors
    ///
    /// Returns `BotError::InvalidMessage` if `base64` or `md5` is missing.
    pub fn new(options: MessageImageOptions) -> Result<Self, BotError> {
        let Some(base64) = options.base64 else {
            return Err(BotError::InvalidMessage(
                "image message requires base64 content".to_string(),
            ));
        };
        let Some(md5) = options.md5 else {
            return Err(BotError::InvalidMessage(
                "image message requires an md5 digest".to_string(),
            ));
        };

        Ok(Self {
            base64,
            md5,
            target: Target {
                chat_id: options.chat_id,
                visible_to_user: options.visible_to_user,
            },
        })
    }

    #[must_use]
    pub fn base64(&self) -> &str {
        &self.base64
    }

    #[must_use]
    pub fn md5(&self) -> &str {
        &self.md5
    }
}

impl Message for MessageImage {
    fn msg_type(&self) -> &'static str {
        "image"
    }

    fn to_send_object(&self) -> Value {
        envelope(
            self.msg_type(),
            json!({ "base64": self.base64, "md5": self.md5 }),
            &self.target,
            &[],
        )
    }
}

//! Outbound message value objects.
//!
//! Each message is immutable once built and knows how to turn itself into the
//! JSON payload the robot webhook expects.

mod attachment;
mod image;
mod markdown;
mod news;
mod text;

pub use attachment::{
    Attachment, AttachmentActionButton, AttachmentActionButtonOptions, AttachmentOptions,
};
pub use image::{MessageImage, MessageImageOptions};
pub use markdown::{MessageMarkdown, MessageMarkdownOptions};
pub use news::{Article, ArticleOptions, MessageNews, MessageNewsOptions};
pub use text::{MessageText, MessageTextOptions};

use serde_json::{Map, Value};

/// A value that can be posted to a webhook.
pub trait Message: Send + Sync {
    /// The `msgtype` this message is sent as.
    fn msg_type(&self) -> &'static str;

    /// Build the wire payload.
    fn to_send_object(&self) -> Value;
}

impl Message for Box<dyn Message> {
    fn msg_type(&self) -> &'static str {
        (**self).msg_type()
    }

    fn to_send_object(&self) -> Value {
        (**self).to_send_object()
    }
}

/// Delivery fields shared by every sendable message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Target {
    pub chat_id: Option<String>,
    pub visible_to_user: Vec<String>,
}

/// Wrap a message body into the common envelope:
/// `{"msgtype": .., <msgtype>: body, "chatid"?, "visible_to_user"?, "attachments"?}`.
pub(crate) fn envelope(
    msg_type: &str,
    body: Value,
    target: &Target,
    attachments: &[Attachment],
) -> Value {
    let mut payload = Map::new();
    payload.insert("msgtype".to_string(), Value::from(msg_type));
    payload.insert(msg_type.to_string(), body);

    if let Some(chat_id) = &target.chat_id {
        payload.insert("chatid".to_string(), Value::from(chat_id.as_str()));
    }
    if !target.visible_to_user.is_empty() {
        payload.insert(
            "visible_to_user".to_string(),
            Value::from(target.visible_to_user.join("|")),
        );
    }
    if !attachments.is_empty() {
        payload.insert(
            "attachments".to_string(),
            Value::Array(attachments.iter().map(Attachment::to_send_object).collect()),
        );
    }

    Value::Object(payload)
}

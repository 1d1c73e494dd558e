use serde_json::{Value, json};

use super::{Attachment, Message, Target, envelope};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageMarkdownOptions {
    pub content: String,
    pub chat_id: Option<String>,
    pub visible_to_user: Vec<String>,
    pub attachments: Vec<Attachment>,
}

/// Markdown message. Mentions are written inline as `<@userid>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageMarkdown {
    content: String,
    target: Target,
    attachments: Vec<Attachment>,
}

impl MessageMarkdown {
    #[must_use]
    pub fn new(options: MessageMarkdownOptions) -> Self {
        Self {
            content: options.content,
            target: Target {
                chat_id: options.chat_id,
                visible_to_user: options.visible_to_user,
            },
            attachments: options.attachments,
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Message for MessageMarkdown {
    fn msg_type(&self) -> &'static str {
        "markdown"
    }

    fn to_send_object(&self) -> Value {
        envelope(
            self.msg_type(),
            json!({ "content": self.content }),
            &self.target,
            &self.attachments,
        )
    }
}

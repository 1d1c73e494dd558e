use serde_json::{Value, json};

use super::{Attachment, Message, Target, envelope};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageTextOptions {
    pub content: String,
    /// User ids to mention; `@all` mentions everyone.
    pub mentioned_list: Vec<String>,
    pub mentioned_mobile_list: Vec<String>,
    pub chat_id: Option<String>,
    pub visible_to_user: Vec<String>,
    pub attachments: Vec<Attachment>,
}

/// Plain text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText {
    content: String,
    mentioned_list: Vec<String>,
    mentioned_mobile_list: Vec<String>,
    target: Target,
    attachments: Vec<Attachment>,
}

impl MessageText {
    #[must_use]
    pub fn new(options: MessageTextOptions) -> Self {
        Self {
            content: options.content,
            mentioned_list: options.mentioned_list,
            mentioned_mobile_list: options.mentioned_mobile_list,
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

impl Message for MessageText {
    fn msg_type(&self) -> &'static str {
        "text"
    }

    fn to_send_object(&self) -> Value {
        let mut body = json!({ "content": self.content });
        if !self.mentioned_list.is_empty() {
            body["mentioned_list"] = json!(self.mentioned_list);
        }
        if !self.mentioned_mobile_list.is_empty() {
            body["mentioned_mobile_list"] = json!(self.mentioned_mobile_list);
        }

        envelope(self.msg_type(), body, &self.target, &self.attachments)
    }
}

use serde::{Deserialize, Serialize};

/// Chat metadata fetched from the platform on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatInfo {
    pub chat_id: String,
    pub name: String,
    pub members: Vec<ChatMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMember {
    pub user_id: String,
    pub alias: String,
    pub name: String,
}

/// Raw envelope returned by the chat info endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatInfoResponse {
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: Option<String>,
    #[serde(default)]
    pub chatid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub members: Vec<ChatInfoResponseMember>,
}

#[derive(Debug, Deserialize)]
pub struct ChatInfoResponseMember {
    pub userid: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub name: String,
}

impl ChatInfoResponse {
    #[must_use]
    pub fn into_chat_info(self) -> ChatInfo {
        ChatInfo {
            chat_id: self.chatid,
            name: self.name,
            members: self
                .members
                .into_iter()
                .map(|m| ChatMember {
                    user_id: m.userid,
                    alias: m.alias,
                    name: m.name,
                })
                .collect(),
        }
    }
}

/// Message pushed by the platform to a bot's callback URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackMessage {
    #[serde(rename = "webhook_url", default)]
    pub webhook_url: Option<String>,
    #[serde(rename = "chatid")]
    pub chat_id: String,
    #[serde(rename = "chattype", default)]
    pub chat_type: Option<String>,
    #[serde(rename = "msgid", default)]
    pub msg_id: Option<String>,
    #[serde(rename = "get_chat_info_url", default)]
    pub get_chat_info_url: Option<String>,
    pub from: CallbackSender,
    #[serde(rename = "msgtype")]
    pub msg_type: String,
    #[serde(default)]
    pub text: Option<CallbackText>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackSender {
    #[serde(rename = "userid")]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub alias: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackText {
    pub content: String,
}

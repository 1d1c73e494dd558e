use serde::Serialize;
use serde_json::{Value, json};

use super::{Message, Target, envelope};
use crate::errors::BotError;

/// The platform renders at most this many articles per news message.
pub const MAX_ARTICLES: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleOptions {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub picurl: Option<String>,
}

/// One entry of a news message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    picurl: Option<String>,
}

impl Article {
    #[must_use]
    pub fn new(options: ArticleOptions) -> Self {
        Self {
            title: options.title,
            description: options.description,
            url: options.url,
            picurl: options.picurl,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageNewsOptions {
    pub articles: Vec<Article>,
    pub chat_id: Option<String>,
    pub visible_to_user: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageNews {
    articles: Vec<Article>,
    target: Target,
}

impl MessageNews {
    /// # Errors
    ///
    /// Returns `BotError::InvalidMessage` unless there are 1 to
    /// [`MAX_ARTICLES`] articles.
    pub fn new(options: MessageNewsOptions) -> Result<Self, BotError> {
        let count = options.articles.len();
        if count == 0 || count > MAX_ARTICLES {
            return Err(BotError::InvalidMessage(format!(
                "news message requires 1 to {MAX_ARTICLES} articles, got {count}"
            )));
        }

        Ok(Self {
            articles: options.articles,
            target: Target {
                chat_id: options.chat_id,
                visible_to_user: options.visible_to_user,
            },
        })
    }

    #[must_use]
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }
}

impl Message for MessageNews {
    fn msg_type(&self) -> &'static str {
        "news"
    }

    fn to_send_object(&self) -> Value {
        envelope(
            self.msg_type(),
            json!({ "articles": self.articles }),
            &self.target,
            &[],
        )
    }
}

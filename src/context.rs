//! Message facade: fetch chat info, build messages and post them to a webhook.

use std::sync::Arc;
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::debug;

use crate::bot::Bot;
use crate::core::models::{ChatInfo, ChatInfoResponse};
use crate::errors::BotError;
use crate::messages::{
    Article, ArticleOptions, Attachment, AttachmentActionButton, AttachmentActionButtonOptions,
    AttachmentOptions, Message, MessageImage, MessageImageOptions, MessageMarkdown,
    MessageMarkdownOptions, MessageNews, MessageNewsOptions, MessageText, MessageTextOptions,
};
use crate::utils::hash::digest_md5;

/// Per-request settings handed to the HTTP layer when downloading images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpOptions {
    pub timeout: Option<Duration>,
    /// Proxy URL, e.g. `http://127.0.0.1:8888`.
    pub proxy: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Context {
    bot: Option<Arc<Bot>>,
    http: reqwest::Client,
}

impl Context {
    /// Context sharing the HTTP client and webhook of `bot`.
    #[must_use]
    pub fn new(bot: Arc<Bot>) -> Self {
        let http = bot.http().clone();
        Self {
            bot: Some(bot),
            http,
        }
    }

    /// Context with its own client and no default webhook.
    #[must_use]
    pub fn standalone() -> Self {
        Self {
            bot: None,
            http: reqwest::Client::new(),
        }
    }

    #[must_use]
    pub fn bot(&self) -> Option<&Arc<Bot>> {
        self.bot.as_ref()
    }

    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Fetch chat info from `url`.
    ///
    /// Returns `None` when it is not available. Failures are never returned:
    /// they go to the bot's diagnostic channel and error observers instead.
    pub async fn get_chat_info(&self, url: &str) -> Option<ChatInfo> {
        match self.fetch_chat_info(url).await {
            Ok(info) => Some(info),
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    async fn fetch_chat_info(&self, url: &str) -> Result<ChatInfo, BotError> {
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        let response: ChatInfoResponse = serde_json::from_slice(&body)?;

        if response.errcode != 0 {
            return Err(BotError::ApiError {
                code: response.errcode,
                message: response.errmsg.unwrap_or_default(),
            });
        }

        Ok(response.into_chat_info())
    }

    fn report(&self, error: &BotError) {
        match &self.bot {
            Some(bot) => {
                bot.debug(error);
                bot.emit_error(error);
            }
            None => debug!(error = %error, "Standalone context request failed"),
        }
    }

    #[must_use]
    pub fn create_text(&self, options: MessageTextOptions) -> MessageText {
        MessageText::new(options)
    }

    #[must_use]
    pub fn create_markdown(&self, options: MessageMarkdownOptions) -> MessageMarkdown {
        MessageMarkdown::new(options)
    }

    /// # Errors
    ///
    /// Returns `BotError::InvalidMessage` if `base64` or `md5` is missing.
    pub fn create_image(&self, options: MessageImageOptions) -> Result<MessageImage, BotError> {
        MessageImage::new(options)
    }

    /// Download an image and build an image message from its bytes.
    ///
    /// The computed `md5`/`base64` are merged first and `options` second, so
    /// any `md5` or `base64` set by the caller replaces the computed one.
    /// With a proxy, a dedicated client is built that still carries the
    /// bot's default timeout; a per-call timeout overrides it.
    ///
    /// # Errors
    ///
    /// Returns `BotError::HttpError` if the download fails.
    pub async fn create_image_by_url(
        &self,
        url: &str,
        options: Option<MessageImageOptions>,
        http_options: Option<&HttpOptions>,
    ) -> Result<MessageImage, BotError> {
        let client = match http_options.and_then(|o| o.proxy.as_deref()) {
            Some(proxy) => {
                // A proxied client keeps the bot's default timeout
                let mut builder = reqwest::Client::builder().proxy(reqwest::Proxy::all(proxy)?);
                if let Some(timeout) = self.bot.as_deref().and_then(Bot::timeout) {
                    builder = builder.timeout(timeout);
                }
                builder.build()?
            }
            None => self.http.clone(),
        };

        let mut request = client.get(url);
        if let Some(timeout) = http_options.and_then(|o| o.timeout) {
            request = request.timeout(timeout);
        }

        let image = request.send().await?.error_for_status()?.bytes().await?;

        let computed = MessageImageOptions {
            md5: Some(digest_md5(&image)),
            base64: Some(STANDARD.encode(&image)),
            ..Default::default()
        };

        self.create_image(computed.merged_with(options.unwrap_or_default()))
    }

    /// # Errors
    ///
    /// Returns `BotError::InvalidMessage` unless there are 1 to 8 articles.
    pub fn create_news(&self, options: MessageNewsOptions) -> Result<MessageNews, BotError> {
        MessageNews::new(options)
    }

    #[must_use]
    pub fn create_article(&self, options: ArticleOptions) -> Article {
        Article::new(options)
    }

    /// # Errors
    ///
    /// Returns `BotError::InvalidMessage` when no actions are given.
    pub fn create_attachment(&self, options: AttachmentOptions) -> Result<Attachment, BotError> {
        Attachment::new(options)
    }

    #[must_use]
    pub fn create_attachment_action_button(
        &self,
        options: AttachmentActionButtonOptions,
    ) -> AttachmentActionButton {
        AttachmentActionButton::new(options)
    }

    /// Post `message` to `url`, or to the bot's webhook when `url` is `None`.
    ///
    /// The response body is not inspected; callers that care about the
    /// platform's `errcode` must read it themselves.
    ///
    /// # Errors
    ///
    /// Returns `BotError::MissingWebhook` if there is no URL to post to, or
    /// `BotError::HttpError` if the request fails.
    pub async fn send_message(
        &self,
        message: &dyn Message,
        url: Option<&str>,
    ) -> Result<reqwest::Response, BotError> {
        let url = match url {
            Some(url) => url,
            None => self
                .bot
                .as_deref()
                .map(Bot::webhook)
                .ok_or(BotError::MissingWebhook)?,
        };

        let response = self
            .http
            .post(url)
            .json(&message.to_send_object())
            .send()
            .await?
            .error_for_status()?;

        Ok(response)
    }

    /// # Errors
    ///
    /// See [`Context::send_message`].
    pub async fn send_text(
        &self,
        options: MessageTextOptions,
    ) -> Result<reqwest::Response, BotError> {
        let message = self.create_text(options);
        self.send_message(&message, None).await
    }

    /// # Errors
    ///
    /// See [`Context::send_message`].
    pub async fn send_markdown(
        &self,
        options: MessageMarkdownOptions,
    ) -> Result<reqwest::Response, BotError> {
        let message = self.create_markdown(options);
        self.send_message(&message, None).await
    }

    /// # Errors
    ///
    /// See [`Context::create_image`] and [`Context::send_message`].
    pub async fn send_image(
        &self,
        options: MessageImageOptions,
    ) -> Result<reqwest::Response, BotError> {
        let message = self.create_image(options)?;
        self.send_message(&message, None).await
    }

    /// # Errors
    ///
    /// See [`Context::create_image_by_url`] and [`Context::send_message`].
    pub async fn send_image_by_url(
        &self,
        url: &str,
        options: Option<MessageImageOptions>,
        http_options: Option<&HttpOptions>,
    ) -> Result<reqwest::Response, BotError> {
        let message = self.create_image_by_url(url, options, http_options).await?;
        self.send_message(&message, None).await
    }

    /// # Errors
    ///
    /// See [`Context::create_news`] and [`Context::send_message`].
    pub async fn send_news(
        &self,
        options: MessageNewsOptions,
    ) -> Result<reqwest::Response, BotError> {
        let message = self.create_news(options)?;
        self.send_message(&message, None).await
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::standalone()
    }
}

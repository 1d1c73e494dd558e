//! Bot: one webhook, one HTTP client, one inbound router.

mod router;
pub mod signature;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use tracing::debug;
use url::Url;

use crate::context::Context;
use crate::core::config::BotOptions;
use crate::core::models::CallbackMessage;
use crate::errors::BotError;
use crate::messages::Message;

/// Observer invoked synchronously for every failure a bot absorbs.
pub type ErrorObserver = Arc<dyn Fn(&BotError) + Send + Sync>;

/// Reply produced by a [`MessageHandler`]; `None` means no passive reply.
pub type HandlerReply = Option<Box<dyn Message>>;

/// Bot-specific handling of inbound callback messages.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// # Errors
    ///
    /// An error is reported to the bot's error observers and answered with 500.
    async fn handle(
        &self,
        ctx: &Context,
        message: &CallbackMessage,
    ) -> Result<HandlerReply, BotError>;
}

pub struct Bot {
    name: String,
    webhook: String,
    token: Option<String>,
    timeout: Option<Duration>,
    http: reqwest::Client,
    handler: Option<Arc<dyn MessageHandler>>,
    error_observers: Vec<ErrorObserver>,
}

impl Bot {
    /// Build a bot and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns `BotError::ConfigError` if the webhook is not an absolute
    /// http(s) URL, or `BotError::HttpError` if the client cannot be built.
    pub fn new(options: BotOptions) -> Result<Self, BotError> {
        let webhook = Url::parse(&options.webhook)
            .map_err(|e| BotError::ConfigError(format!("webhook '{}': {e}", options.webhook)))?;
        if !matches!(webhook.scheme(), "http" | "https") {
            return Err(BotError::ConfigError(format!(
                "webhook '{}' must use http or https",
                options.webhook
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            name: options.name,
            webhook: options.webhook,
            token: options.token,
            timeout: options.timeout,
            http,
            handler: None,
            error_observers: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_handler(mut self, handler: impl MessageHandler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    #[must_use]
    pub fn on_error(mut self, observer: impl Fn(&BotError) + Send + Sync + 'static) -> Self {
        self.error_observers.push(Arc::new(observer));
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn webhook(&self) -> &str {
        &self.webhook
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Default request timeout of this bot's HTTP client.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn handler(&self) -> Option<&Arc<dyn MessageHandler>> {
        self.handler.as_ref()
    }

    /// Diagnostic channel of this bot.
    pub fn debug(&self, message: impl fmt::Display) {
        debug!(bot = %self.name, "{}", message);
    }

    /// Notify every registered observer, in registration order.
    pub fn emit_error(&self, error: &BotError) {
        for observer in &self.error_observers {
            observer(error);
        }
    }

    /// Router serving this bot's callback endpoint at `/`.
    pub fn create_router(self: &Arc<Self>) -> Router {
        router::build(Arc::clone(self))
    }
}

impl fmt::Debug for Bot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bot")
            .field("name", &self.name)
            .field("webhook", &self.webhook)
            .field("has_token", &self.token.is_some())
            .field("timeout", &self.timeout)
            .field("has_handler", &self.handler.is_some())
            .field("error_observers", &self.error_observers.len())
            .finish()
    }
}

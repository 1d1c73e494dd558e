//! tenbot - a small framework for WeCom group-robot bots driven by HTTP webhooks.
//!
//! An [`App`] hosts any number of [`Bot`]s, each mounted on its own path. A bot
//! owns one HTTP client and one webhook URL; its [`Context`] builds messages
//! (text, markdown, image, news, attachment) and posts them to the webhook.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tenbot::core::config::{AppOptions, BotOptions};
//! use tenbot::messages::MessageTextOptions;
//! use tenbot::{App, Bot, Context};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     tenbot::setup_logging();
//!
//!     let bot = Arc::new(Bot::new(BotOptions {
//!         name: "notifier".to_string(),
//!         webhook: "https://qyapi.weixin.qq.com/cgi-bin/webhook/send?key=KEY".to_string(),
//!         ..Default::default()
//!     })?);
//!
//!     // Push a message straight to the webhook
//!     let ctx = Context::new(Arc::clone(&bot));
//!     ctx.send_text(MessageTextOptions {
//!         content: "deploy finished".to_string(),
//!         mentioned_list: vec!["@all".to_string()],
//!         ..Default::default()
//!     })
//!     .await?;
//!
//!     // Serve the bot's callback endpoint on /notifier
//!     let mut app = App::new(AppOptions::default());
//!     app.register(bot, "/notifier")?;
//!     let server = app.run().await?;
//!     tokio::signal::ctrl_c().await?;
//!     server.shutdown().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod bot;
pub mod context;
pub mod core;
pub mod errors;
pub mod messages;
pub mod utils;

pub use app::{App, ServerHandle};
pub use bot::{Bot, MessageHandler};
pub use context::{Context, HttpOptions};
pub use errors::BotError;

/// Configure structured JSON logging.
///
/// Honors `RUST_LOG`, defaulting to `info,tenbot=debug`. Calling it again
/// after a subscriber is installed is a no-op.
///
/// # Example
///
/// ```
/// tenbot::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tenbot=debug".into());
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

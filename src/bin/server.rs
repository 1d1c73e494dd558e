//! Echo bot: replies to every text callback with the same text, mentioning
//! the sender.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use tenbot::bot::HandlerReply;
use tenbot::core::config::{AppOptions, BotOptions};
use tenbot::core::models::CallbackMessage;
use tenbot::messages::MessageTextOptions;
use tenbot::{App, Bot, BotError, Context, MessageHandler};
use tracing::{info, warn};

struct EchoHandler;

#[async_trait]
impl MessageHandler for EchoHandler {
    async fn handle(
        &self,
        ctx: &Context,
        message: &CallbackMessage,
    ) -> Result<HandlerReply, BotError> {
        let Some(text) = &message.text else {
            return Ok(None);
        };

        if text.content.trim() == "/chatinfo" {
            if let Some(url) = &message.get_chat_info_url
                && let Some(info) = ctx.get_chat_info(url).await
            {
                info!(chat = %info.chat_id, members = info.members.len(), "Fetched chat info");
            }
            return Ok(None);
        }

        let reply = ctx.create_text(MessageTextOptions {
            content: text.content.clone(),
            mentioned_list: vec![message.from.user_id.clone()],
            ..Default::default()
        });

        Ok(Some(Box::new(reply)))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tenbot::setup_logging();

    let app_options = AppOptions::from_env().context("Failed to load app options")?;
    let bot_options = BotOptions::from_env().context("Failed to load bot options")?;
    let path = std::env::var("TENBOT_BOT_PATH").unwrap_or_else(|_| "/".to_string());

    let bot = Bot::new(bot_options)?
        .with_handler(EchoHandler)
        .on_error(|err| warn!(error = %err, "Bot error"));

    let mut app = App::new(app_options);
    app.register(Arc::new(bot), &path)?;

    let server = app.run().await?;
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    info!("Shutting down");
    server.shutdown().await?;

    Ok(())
}

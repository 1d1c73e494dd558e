use std::env;
use std::time::Duration;

use crate::errors::BotError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BOT_NAME: &str = "tenbot";

/// Where the app listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppOptions {
    pub host: String,
    pub port: u16,
}

impl AppOptions {
    /// Reads `TENBOT_HOST` and `TENBOT_PORT`.
    ///
    /// # Errors
    ///
    /// Returns `BotError::ConfigError` if `TENBOT_PORT` is not a valid port.
    pub fn from_env() -> Result<Self, BotError> {
        let host = env::var("TENBOT_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match env::var("TENBOT_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| BotError::ConfigError(format!("TENBOT_PORT: {e}")))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self { host, port })
    }
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Settings for a single [`Bot`](crate::bot::Bot).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotOptions {
    /// Diagnostic name, not required to be unique.
    pub name: String,
    /// Default URL outbound messages are posted to.
    pub webhook: String,
    /// Callback token used to verify inbound signatures.
    pub token: Option<String>,
    /// Default timeout of the bot's HTTP client.
    pub timeout: Option<Duration>,
}

impl BotOptions {
    /// Reads `TENBOT_BOT_NAME`, `TENBOT_WEBHOOK`, `TENBOT_TOKEN` and
    /// `TENBOT_HTTP_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `BotError::ConfigError` if `TENBOT_WEBHOOK` is unset or the
    /// timeout is not a number of seconds.
    pub fn from_env() -> Result<Self, BotError> {
        let timeout = match env::var("TENBOT_HTTP_TIMEOUT_SECS") {
            Ok(raw) => Some(Duration::from_secs(raw.parse::<u64>().map_err(|e| {
                BotError::ConfigError(format!("TENBOT_HTTP_TIMEOUT_SECS: {e}"))
            })?)),
            Err(_) => None,
        };

        Ok(Self {
            name: env::var("TENBOT_BOT_NAME").unwrap_or_else(|_| DEFAULT_BOT_NAME.to_string()),
            webhook: env::var("TENBOT_WEBHOOK")
                .map_err(|e| BotError::ConfigError(format!("TENBOT_WEBHOOK: {e}")))?,
            token: env::var("TENBOT_TOKEN").ok().filter(|t| !t.is_empty()),
            timeout,
        })
    }
}

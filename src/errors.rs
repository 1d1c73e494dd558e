use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("bot [{existing}] has already registered on path '{path}'")]
    DuplicatePath { existing: String, path: String },

    #[error("invalid bot path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("No bots registered")]
    NoBotsRegistered,

    #[error("Failed to bind server on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Chat platform returned error {code}: {message}")]
    ApiError { code: i64, message: String },

    #[error("Failed to parse payload: {0}")]
    ParseError(String),

    #[error("No webhook URL given and the context is not bound to a bot")]
    MissingWebhook,

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),
}

impl From<reqwest::Error> for BotError {
    fn from(error: reqwest::Error) -> Self {
        BotError::HttpError(error.to_string())
    }
}

impl From<serde_json::Error> for BotError {
    fn from(error: serde_json::Error) -> Self {
        BotError::ParseError(error.to_string())
    }
}

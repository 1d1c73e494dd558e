//! Inbound callback endpoint of a bot.
//!
//! - `GET /`: callback URL verification, answers with `echostr`
//! - `POST /`: JSON callback message, answered with the handler's reply

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::{error, instrument, warn};

use super::Bot;
use super::signature::verify_signature;
use crate::context::Context;
use crate::core::models::CallbackMessage;

#[derive(Debug, Default, Deserialize)]
struct SignatureQuery {
    msg_signature: Option<String>,
    timestamp: Option<String>,
    nonce: Option<String>,
    echostr: Option<String>,
}

pub(super) fn build(bot: Arc<Bot>) -> Router {
    Router::new()
        .route("/", get(verify_url).post(receive_callback))
        .with_state(bot)
}

/// Passes when the bot has no token configured.
fn check_signature(bot: &Bot, query: &SignatureQuery, payload: &str) -> Result<(), StatusCode> {
    let Some(token) = bot.token() else {
        return Ok(());
    };

    let (Some(signature), Some(timestamp), Some(nonce)) = (
        query.msg_signature.as_deref(),
        query.timestamp.as_deref(),
        query.nonce.as_deref(),
    ) else {
        warn!(bot = %bot.name(), "Missing signature query parameters");
        return Err(StatusCode::UNAUTHORIZED);
    };

    if verify_signature(token, timestamp, nonce, payload, signature) {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

#[instrument(name = "bot.verify_url", skip_all)]
async fn verify_url(State(bot): State<Arc<Bot>>, Query(query): Query<SignatureQuery>) -> Response {
    let Some(echostr) = query.echostr.as_deref() else {
        warn!(bot = %bot.name(), "Missing echostr");
        return (StatusCode::BAD_REQUEST, "missing echostr").into_response();
    };

    if let Err(status) = check_signature(&bot, &query, echostr) {
        return status.into_response();
    }

    bot.debug("callback URL verified");
    echostr.to_string().into_response()
}

#[instrument(name = "bot.callback", skip_all)]
async fn receive_callback(
    State(bot): State<Arc<Bot>>,
    Query(query): Query<SignatureQuery>,
    body: Bytes,
) -> Response {
    let Ok(body_str) = std::str::from_utf8(&body) else {
        warn!(bot = %bot.name(), "Callback body is not valid UTF-8");
        return (StatusCode::BAD_REQUEST, "invalid body encoding").into_response();
    };

    if let Err(status) = check_signature(&bot, &query, body_str) {
        return status.into_response();
    }

    let message: CallbackMessage = match serde_json::from_str(body_str) {
        Ok(message) => message,
        Err(e) => {
            warn!(bot = %bot.name(), error = %e, "Failed to parse callback message");
            return (StatusCode::BAD_REQUEST, format!("Parse Error: {e}")).into_response();
        }
    };

    bot.debug(format_args!(
        "received {} message from {} in {}",
        message.msg_type, message.from.user_id, message.chat_id
    ));

    let Some(handler) = bot.handler().cloned() else {
        return StatusCode::OK.into_response();
    };

    let ctx = Context::new(Arc::clone(&bot));
    match handler.handle(&ctx, &message).await {
        Ok(Some(reply)) => Json(reply.to_send_object()).into_response(),
        Ok(None) => StatusCode::OK.into_response(),
        Err(e) => {
            error!(bot = %bot.name(), error = %e, "Callback handler failed");
            bot.emit_error(&e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

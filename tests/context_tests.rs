//! Context behavior against a mocked chat platform.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::json;
use tenbot::core::config::BotOptions;
use tenbot::messages::{
    ArticleOptions, Message, MessageImageOptions, MessageMarkdownOptions, MessageNewsOptions,
    MessageTextOptions,
};
use tenbot::utils::hash::digest_md5;
use tenbot::{Bot, BotError, Context, HttpOptions};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context as LayerContext, SubscriberExt};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Bot posting to `{server}/webhook`, counting observed errors.
fn counting_bot(server: &MockServer) -> (Arc<Bot>, Arc<AtomicUsize>) {
    let errors = Arc::new(AtomicUsize::new(0));
    let observed = Arc::clone(&errors);

    let bot = Bot::new(BotOptions {
        name: "test-bot".to_string(),
        webhook: format!("{}/webhook", server.uri()),
        ..Default::default()
    })
    .unwrap()
    .on_error(move |_| {
        observed.fetch_add(1, Ordering::SeqCst);
    });

    (Arc::new(bot), errors)
}

/// Counts events whose `bot` field equals the given bot name.
struct BotEventCounter {
    bot: &'static str,
    count: Arc<AtomicUsize>,
}

struct BotField(Option<String>);

impl Visit for BotField {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "bot" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

impl<S: Subscriber> Layer<S> for BotEventCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: LayerContext<'_, S>) {
        let mut field = BotField(None);
        event.record(&mut field);
        if field.0.as_deref() == Some(self.bot) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Capture log events of `test-bot` on the current thread.
fn capture_bot_logs() -> (tracing::subscriber::DefaultGuard, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let layer = BotEventCounter {
        bot: "test-bot",
        count: Arc::clone(&count),
    };
    let guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(layer));
    (guard, count)
}

// ─────────────────────────────────────────────────────────────────────────────
// get_chat_info
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_chat_info_maps_success_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chat-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 0,
            "errmsg": "ok",
            "chatid": "wrkSFfCgAA",
            "name": "ops",
            "members": [
                {"userid": "zhangsan", "alias": "zs", "name": "Zhang San"},
                {"userid": "lisi", "alias": "ls", "name": "Li Si"},
                {"userid": "wangwu", "alias": "ww", "name": "Wang Wu"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (bot, errors) = counting_bot(&server);
    let ctx = Context::new(bot);

    let info = ctx
        .get_chat_info(&format!("{}/chat-info", server.uri()))
        .await
        .expect("chat info should be available");

    assert_eq!(info.chat_id, "wrkSFfCgAA");
    assert_eq!(info.name, "ops");
    let users: Vec<(&str, &str)> = info
        .members
        .iter()
        .map(|m| (m.user_id.as_str(), m.alias.as_str()))
        .collect();
    assert_eq!(users, [("zhangsan", "zs"), ("lisi", "ls"), ("wangwu", "ww")]);
    assert_eq!(errors.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_get_chat_info_absorbs_platform_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chat-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 40058,
            "errmsg": "invalid chatid"
        })))
        .mount(&server)
        .await;

    let (bot, errors) = counting_bot(&server);
    let ctx = Context::new(bot);
    let (_guard, logs) = capture_bot_logs();

    let info = ctx
        .get_chat_info(&format!("{}/chat-info", server.uri()))
        .await;

    assert!(info.is_none());
    assert_eq!(errors.load(Ordering::SeqCst), 1);
    assert_eq!(logs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_get_chat_info_absorbs_network_failure() {
    let server = MockServer::start().await;
    let (bot, errors) = counting_bot(&server);
    let ctx = Context::new(bot);
    let (_guard, logs) = capture_bot_logs();

    // Nothing listens on port 1
    let info = ctx.get_chat_info("http://127.0.0.1:1/chat-info").await;

    assert!(info.is_none());
    assert_eq!(errors.load(Ordering::SeqCst), 1);
    assert_eq!(logs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_get_chat_info_success_logs_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chat-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 0,
            "chatid": "wrkSFfCgAA",
            "name": "ops",
            "members": []
        })))
        .mount(&server)
        .await;

    let (bot, errors) = counting_bot(&server);
    let ctx = Context::new(bot);
    let (_guard, logs) = capture_bot_logs();

    assert!(
        ctx.get_chat_info(&format!("{}/chat-info", server.uri()))
            .await
            .is_some()
    );
    assert_eq!(errors.load(Ordering::SeqCst), 0);
    assert_eq!(logs.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_get_chat_info_passes_domain_error_to_observers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chat-info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 93000,
            "errmsg": "invalid webhook url"
        })))
        .mount(&server)
        .await;

    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let bot = Bot::new(BotOptions {
        name: "observed".to_string(),
        webhook: format!("{}/webhook", server.uri()),
        ..Default::default()
    })
    .unwrap()
    .on_error(move |err| sink.lock().unwrap().push(err.to_string()));
    let ctx = Context::new(Arc::new(bot));

    assert!(
        ctx.get_chat_info(&format!("{}/chat-info", server.uri()))
            .await
            .is_none()
    );
    assert_eq!(
        *seen.lock().unwrap(),
        vec!["Chat platform returned error 93000: invalid webhook url".to_string()]
    );
}

#[tokio::test]
async fn test_standalone_get_chat_info_returns_none() {
    let ctx = Context::standalone();
    assert!(ctx.bot().is_none());
    assert!(ctx.get_chat_info("http://127.0.0.1:1/chat-info").await.is_none());
}

// ─────────────────────────────────────────────────────────────────────────────
// send_*
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_send_text_posts_to_default_webhook() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .and(body_json(json!({
            "msgtype": "text",
            "text": { "content": "hello", "mentioned_list": ["@all"] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errcode": 0, "errmsg": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let (bot, _) = counting_bot(&server);
    let ctx = Context::new(bot);

    let response = ctx
        .send_text(MessageTextOptions {
            content: "hello".to_string(),
            mentioned_list: vec!["@all".to_string()],
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_send_markdown_and_news_payloads() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .and(body_json(json!({
            "msgtype": "markdown",
            "markdown": { "content": "# title" }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .and(body_json(json!({
            "msgtype": "news",
            "news": { "articles": [{ "title": "release", "url": "https://example.com" }] }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (bot, _) = counting_bot(&server);
    let ctx = Context::new(bot);

    ctx.send_markdown(MessageMarkdownOptions {
        content: "# title".to_string(),
        ..Default::default()
    })
    .await
    .unwrap();

    let article = ctx.create_article(ArticleOptions {
        title: "release".to_string(),
        url: "https://example.com".to_string(),
        ..Default::default()
    });
    ctx.send_news(MessageNewsOptions {
        articles: vec![article],
        ..Default::default()
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_send_message_to_explicit_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/other-hook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (bot, _) = counting_bot(&server);
    let ctx = Context::new(bot);
    let message = ctx.create_text(MessageTextOptions {
        content: "routed".to_string(),
        ..Default::default()
    });

    ctx.send_message(&message, Some(&format!("{}/other-hook", server.uri())))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_send_does_not_inspect_response_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 93000,
            "errmsg": "invalid webhook url"
        })))
        .mount(&server)
        .await;

    let (bot, errors) = counting_bot(&server);
    let ctx = Context::new(bot);

    let response = ctx
        .send_text(MessageTextOptions {
            content: "x".to_string(),
            ..Default::default()
        })
        .await
        .expect("platform errcode must not turn into an error");

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["errcode"], 93000);
    assert_eq!(errors.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_send_propagates_transport_failure() {
    let bot = Bot::new(BotOptions {
        name: "offline".to_string(),
        webhook: "http://127.0.0.1:1/webhook".to_string(),
        ..Default::default()
    })
    .unwrap();
    let ctx = Context::new(Arc::new(bot));

    let result = ctx
        .send_text(MessageTextOptions {
            content: "x".to_string(),
            ..Default::default()
        })
        .await;

    assert!(matches!(result, Err(BotError::HttpError(_))));
}

#[tokio::test]
async fn test_send_image_posts_image_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .and(body_json(json!({
            "msgtype": "image",
            "image": { "base64": "Zm9vYmFy", "md5": digest_md5(b"foobar") }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (bot, _) = counting_bot(&server);
    let ctx = Context::new(bot);

    ctx.send_image(MessageImageOptions {
        base64: Some("Zm9vYmFy".to_string()),
        md5: Some(digest_md5(b"foobar")),
        ..Default::default()
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_send_image_without_md5_posts_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (bot, _) = counting_bot(&server);
    let ctx = Context::new(bot);

    let result = ctx
        .send_image(MessageImageOptions {
            base64: Some("Zm9vYmFy".to_string()),
            ..Default::default()
        })
        .await;

    assert!(matches!(result, Err(BotError::InvalidMessage(_))));
}

#[tokio::test]
async fn test_standalone_send_without_url_fails() {
    let ctx = Context::standalone();
    let message = ctx.create_text(MessageTextOptions::default());

    let result = ctx.send_message(&message, None).await;
    assert!(matches!(result, Err(BotError::MissingWebhook)));
}

// ─────────────────────────────────────────────────────────────────────────────
// create_image_by_url
// ─────────────────────────────────────────────────────────────────────────────

const IMAGE_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR fake image";

async fn image_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/image.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(IMAGE_BYTES.to_vec()))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_create_image_by_url_computes_digest_and_base64() {
    let server = image_server().await;
    let ctx = Context::standalone();

    let image = ctx
        .create_image_by_url(&format!("{}/image.png", server.uri()), None, None)
        .await
        .unwrap();

    assert_eq!(image.md5(), digest_md5(IMAGE_BYTES));
    assert_eq!(image.base64(), STANDARD.encode(IMAGE_BYTES));
}

#[tokio::test]
async fn test_create_image_by_url_caller_options_win() {
    let server = image_server().await;
    let ctx = Context::standalone();

    let image = ctx
        .create_image_by_url(
            &format!("{}/image.png", server.uri()),
            Some(MessageImageOptions {
                md5: Some("caller-md5".to_string()),
                chat_id: Some("wrkSFfCgAA".to_string()),
                ..Default::default()
            }),
            Some(&HttpOptions {
                timeout: Some(Duration::from_secs(5)),
                proxy: None,
            }),
        )
        .await
        .unwrap();

    assert_eq!(image.md5(), "caller-md5");
    assert_eq!(image.base64(), STANDARD.encode(IMAGE_BYTES));
    assert_eq!(image.to_send_object()["chatid"], "wrkSFfCgAA");
}

#[tokio::test]
async fn test_send_image_by_url_posts_image_payload() {
    let server = image_server().await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .and(body_json(json!({
            "msgtype": "image",
            "image": {
                "base64": STANDARD.encode(IMAGE_BYTES),
                "md5": digest_md5(IMAGE_BYTES)
            }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (bot, _) = counting_bot(&server);
    let ctx = Context::new(bot);

    ctx.send_image_by_url(&format!("{}/image.png", server.uri()), None, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_image_by_url_propagates_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let ctx = Context::standalone();
    let result = ctx
        .create_image_by_url(&format!("{}/missing.png", server.uri()), None, None)
        .await;

    assert!(matches!(result, Err(BotError::HttpError(_))));
}

#[tokio::test]
async fn test_create_image_by_url_through_proxy_keeps_bot_timeout() {
    // The mock answers as the proxy for any absolute-form request
    let proxy = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(IMAGE_BYTES.to_vec())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&proxy)
        .await;

    let bot = Bot::new(BotOptions {
        name: "slow".to_string(),
        webhook: "https://example.com/webhook".to_string(),
        timeout: Some(Duration::from_millis(200)),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(bot.timeout(), Some(Duration::from_millis(200)));
    let ctx = Context::new(Arc::new(bot));

    let started = Instant::now();
    let result = ctx
        .create_image_by_url(
            "http://images.example.com/slow.png",
            None,
            Some(&HttpOptions {
                timeout: None,
                proxy: Some(proxy.uri()),
            }),
        )
        .await;

    assert!(matches!(result, Err(BotError::HttpError(_))));
    assert!(started.elapsed() < Duration::from_secs(3));
}

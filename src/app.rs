//! Path-keyed bot registry served from a single HTTP listener.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::bot::Bot;
use crate::core::config::AppOptions;
use crate::errors::BotError;
use crate::utils::path::{check_static_path, format_path};

pub struct App {
    options: AppOptions,
    /// Insertion order is the mount order.
    bots: Vec<(String, Arc<Bot>)>,
}

impl App {
    #[must_use]
    pub fn new(options: AppOptions) -> Self {
        Self {
            options,
            bots: Vec::new(),
        }
    }

    #[must_use]
    pub fn options(&self) -> &AppOptions {
        &self.options
    }

    /// Register `bot` on `path`; chainable through `?`.
    ///
    /// # Errors
    ///
    /// Returns `BotError::InvalidPath` if a segment would be read as a route
    /// capture or wildcard, or `BotError::DuplicatePath` if a bot is already
    /// registered on the same normalized path.
    pub fn register(&mut self, bot: Arc<Bot>, path: &str) -> Result<&mut Self, BotError> {
        let bot_path = format_path(path);
        check_static_path(&bot_path)?;

        if let Some((_, current)) = self.bots.iter().find(|(p, _)| *p == bot_path) {
            return Err(BotError::DuplicatePath {
                existing: current.name().to_string(),
                path: bot_path,
            });
        }

        debug!("registered bot [{}] on '{}'", bot.name(), path);
        self.bots.push((bot_path, bot));

        Ok(self)
    }

    /// Same as `register(bot, "/")`.
    ///
    /// # Errors
    ///
    /// Returns `BotError::DuplicatePath` if the root is already taken.
    pub fn register_root(&mut self, bot: Arc<Bot>) -> Result<&mut Self, BotError> {
        self.register(bot, "/")
    }

    /// Registered `(path, bot)` pairs in registration order.
    pub fn bots(&self) -> impl Iterator<Item = (&str, &Arc<Bot>)> {
        self.bots.iter().map(|(path, bot)| (path.as_str(), bot))
    }

    /// Compose every bot router under its path.
    #[must_use]
    pub fn router(&self) -> Router {
        self.bots
            .iter()
            .fold(Router::new(), |router, (path, bot)| {
                let bot_router = bot.create_router();
                if path == "/" {
                    router.merge(bot_router)
                } else {
                    router.nest(path, bot_router)
                }
            })
    }

    /// Bind the configured address and start serving in the background.
    ///
    /// # Errors
    ///
    /// Returns `BotError::NoBotsRegistered` before binding anything when the
    /// registry is empty, or `BotError::Bind` if the address cannot be bound.
    pub async fn run(&self) -> Result<ServerHandle, BotError> {
        debug!("registered {} bot(s) in total", self.bots.len());

        if self.bots.is_empty() {
            return Err(BotError::NoBotsRegistered);
        }

        let router = self.router();

        let AppOptions { host, port } = &self.options;
        let addr = format!("{host}:{port}");
        let listener = TcpListener::bind(&addr).await.map_err(|source| {
            debug!("server bind error: {}", source);
            BotError::Bind {
                addr: addr.clone(),
                source,
            }
        })?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| BotError::ServerError(e.to_string()))?;

        println!(
            "tenbot app is listening at http://{}:{}",
            host,
            local_addr.port()
        );
        info!(addr = %local_addr, bots = self.bots.len(), "tenbot app listening");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    // A dropped handle detaches the server instead of stopping it.
                    if shutdown_rx.await.is_err() {
                        std::future::pending::<()>().await;
                    }
                })
                .await;

            if let Err(e) = result {
                error!(error = %e, "Server stopped with error");
            }
        });

        Ok(ServerHandle {
            local_addr,
            shutdown_tx: Some(shutdown_tx),
            task,
        })
    }
}

/// Handle to a running app server.
///
/// Dropping the handle leaves the server running for the life of the
/// runtime; only [`ServerHandle::shutdown`] stops it.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns `BotError::ServerError` if the server task panicked.
    pub async fn shutdown(mut self) -> Result<(), BotError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        self.task
            .await
            .map_err(|e| BotError::ServerError(e.to_string()))
    }
}

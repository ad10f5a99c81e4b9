//! Console host: one server session from config to shutdown.

use std::future::Future;
use std::io;

use crate::config::AppConfig;
use crate::events::{ServerObserver, SharedLogDocument, Tee, TracingObserver};
use crate::logbook::LogDocument;
use crate::server::ServerLifecycle;

/// Starts a server from `cfg`, waits for `shutdown`, stops it and saves the
/// session log when `cfg.logs.save_path` is set.
///
/// A rejected directory or a failed start is reported through the observer
/// and the host keeps waiting for `shutdown`, so the user still sees the
/// message in the log. Only a failure of the shutdown signal itself is
/// returned as an error.
pub async fn run<F>(cfg: &AppConfig, shutdown: F) -> anyhow::Result<SharedLogDocument>
where
    F: Future<Output = io::Result<()>>,
{
    let log_view = SharedLogDocument::new(LogDocument::new(cfg.logs.secret.clone()));
    let observer = Tee(TracingObserver, log_view.clone());
    let mut server = ServerLifecycle::new(observer);

    let selected = match cfg.server.root_directory.as_deref() {
        Some(dir) => server.select_directory(dir).await.is_ok(),
        None => true,
    };

    if selected && server.start(&cfg.server).await.is_ok() {
        if let Some(url) = server.page_url() {
            tracing::info!("Open {} in a browser", url);
        }
    } else {
        tracing::warn!("Server not started; waiting for shutdown");
    }

    shutdown.await?;
    tracing::info!("Shutdown signal received");

    // Errors are already reported through the observer.
    let _ = server.stop().await;

    if let Some(path) = cfg.logs.save_path.as_deref() {
        let mut snapshot = log_view.with(|doc| doc.clone());
        match snapshot.save(path).await {
            Ok(_) => log_view.with(|doc| *doc = snapshot),
            Err(e) => server.observer().on_log(&e.to_string()),
        }
    }

    Ok(log_view)
}

//! HTTP server lifecycle — bind, spawn, graceful shutdown.
//!
//! Pattern: bind → spawn background task → return handle with a
//! oneshot shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::api::router::app_router;
use crate::core_state::CoreState;

/// Handle to a running API server.
pub struct ApiServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    /// Shut down the server gracefully. Safe to call twice.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }
}

/// Bind the listener, mount the router, and spawn the axum server in
/// a background task. Returns a handle with the bound address (useful
/// when the requested port is 0) and a shutdown channel.
pub async fn start_server(
    core: Arc<CoreState>,
    addr: SocketAddr,
) -> Result<ApiServer, std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;

    tracing::info!(%addr, "API server binding");

    let app = app_router(core);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    use std::time::Duration;

    fn test_core() -> Arc<CoreState> {
        let settings = Settings {
            port: 0,
            scrape: None,
            scrape_base_url: "http://127.0.0.1:1".to_string(),
            interactions_page_base: "http://127.0.0.1:1/drug_interactions".to_string(),
            terminology_base_url: "http://127.0.0.1:1".to_string(),
            http_timeout: Duration::from_millis(200),
            cooldown: Duration::from_secs(8),
        };
        Arc::new(CoreState::new(settings))
    }

    async fn start_on_loopback() -> ApiServer {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        start_server(test_core(), addr)
            .await
            .expect("server should start")
    }

    #[tokio::test]
    async fn start_and_health_check() {
        let mut server = start_on_loopback().await;
        assert!(server.addr.port() > 0);

        let url = format!("http://{}/health", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["ok"], true);

        server.shutdown();
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let mut server = start_on_loopback().await;

        let url = format!("http://{}/nonexistent", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        server.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start_on_loopback().await;
        server.shutdown();
        server.shutdown();
    }
}

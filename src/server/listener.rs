use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::http::connection::Connection;
use crate::router::Router;

/// Binds `cfg.listen_addr` and serves connections until an accept fails.
pub async fn run(cfg: &ServerConfig, router: Arc<Router>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("binding {}", cfg.listen_addr))?;
    info!("Listening on {}", cfg.listen_addr);

    serve(listener, cfg, router).await
}

/// Accept loop over an already bound listener, one task per connection.
pub async fn serve(
    listener: TcpListener,
    cfg: &ServerConfig,
    router: Arc<Router>,
) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let router = Arc::clone(&router);
        let config = cfg.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, router, config);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}

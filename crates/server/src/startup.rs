use std::{future::Future, net::SocketAddr, sync::Arc};

use configs::ServerConfig;
use service::Registry;
use tokio::net::TcpListener;
use tracing::info;

use crate::{routes, state::AppState};

/// Bind `host:port` from the server config and serve until `shutdown` resolves.
///
/// The registry is created empty here and lives for the lifetime of the server.
pub async fn run<F>(cfg: &ServerConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::new(Arc::new(Registry::new()));
    let app = routes::build_router(state);

    let listener = TcpListener::bind((cfg.host.as_str(), cfg.port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, event = "listening", "customer registry listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

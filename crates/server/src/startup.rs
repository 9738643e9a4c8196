use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info};

use service::{entries::EntryService, store::EntryStore};

use crate::errors::StartupError;
use crate::routes;

/// Bind the listener; failure here is fatal for the process.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, StartupError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })
}

/// Router over `store`, ready to serve.
pub fn build_app(store: Arc<dyn EntryStore>) -> Router {
    routes::build_router(EntryService::new(store))
}

/// Resolves once Ctrl+C is received. If the handler cannot be installed the
/// server keeps running until killed.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!(
            service = "restkv",
            event = "shutdown_signal",
            "received Ctrl+C, shutting down"
        ),
        Err(e) => {
            error!(
                service = "restkv",
                event = "signal_install_failed",
                error = %e,
                "cannot listen for Ctrl+C"
            );
            std::future::pending::<()>().await;
        }
    }
}

/// Serve `store` on `addr` until Ctrl+C.
pub async fn run(addr: SocketAddr, store: Arc<dyn EntryStore>) -> Result<(), StartupError> {
    run_with_shutdown(addr, store, shutdown_signal()).await
}

/// Serve `store` on `addr` until `shutdown` resolves.
pub async fn run_with_shutdown<F>(
    addr: SocketAddr,
    store: Arc<dyn EntryStore>,
    shutdown: F,
) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = bind(addr).await?;
    serve(listener, store, shutdown).await
}

/// Serve on an already bound listener; in-flight requests are allowed to
/// finish once `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    store: Arc<dyn EntryStore>,
    shutdown: F,
) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local = listener.local_addr().map_err(StartupError::Serve)?;
    info!(service = "restkv", event = "listening", addr = %local, "REST service started");

    axum::serve(listener, build_app(store))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(StartupError::Serve)
}

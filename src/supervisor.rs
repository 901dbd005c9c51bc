//! Runs the client and device servers side by side.
//!
//! Both servers share one [`CancellationToken`]. Whichever stops first, for
//! any reason, cancels it, and the other drains in-flight requests and stops
//! too. SIGINT/SIGTERM cancel the same token.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::ServeError;
use crate::routes::{client_router, device_router, Surface};
use crate::AppState;

/// Serve both APIs until `shutdown` is cancelled or one of them fails.
///
/// Returns the first error observed, if any.
pub async fn run(state: AppState, shutdown: CancellationToken) -> Result<(), ServeError> {
    let mut servers = JoinSet::new();
    servers.spawn(serve(
        Surface::Client,
        state.config.client_api.listen.clone(),
        client_router(state.clone()),
        shutdown.clone(),
    ));
    servers.spawn(serve(
        Surface::Device,
        state.config.device_api.listen.clone(),
        device_router(state.clone()),
        shutdown.clone(),
    ));

    let mut first_error = None;
    while let Some(joined) = servers.join_next().await {
        shutdown.cancel();
        let result = joined.map_err(ServeError::from).and_then(|r| r);
        if let Err(e) = result {
            error!("{e}");
            first_error.get_or_insert(e);
        }
    }

    first_error.map_or(Ok(()), Err)
}

async fn serve(
    surface: Surface,
    listen: String,
    app: Router,
    shutdown: CancellationToken,
) -> Result<(), ServeError> {
    let name = surface.as_str();
    let listener = TcpListener::bind(&listen)
        .await
        .map_err(|source| ServeError::Bind {
            surface: name,
            listen: listen.clone(),
            source,
        })?;
    match listener.local_addr() {
        Ok(addr) => info!("{name} API listening on {addr}"),
        Err(_) => info!("{name} API listening on {listen}"),
    }

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown.cancelled_owned())
    .await
    .map_err(|source| ServeError::Serve {
        surface: name,
        source,
    })?;

    info!("{name} API stopped");
    Ok(())
}

/// Resolve on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received SIGINT"),
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                }
            }
            Err(e) => {
                warn!("Failed to register SIGTERM handler: {e}");
                ctrl_c.await.ok();
                info!("Received SIGINT");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received SIGINT");
    }
}

//! HTTP server lifecycle: bind, serve, sweep, shut down.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::broadcast;

use crate::db::CredentialStore;
use crate::proxy::{routes, SharedState};

/// Runs the server until Ctrl-C, then drains in-flight requests.
pub async fn serve(state: SharedState) -> anyhow::Result<()> {
    let port = state.config.port;
    let sweep_interval_ms = state.config.sweep_interval_ms;

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    spawn_expiry_sweep(
        state.store.clone(),
        sweep_interval_ms,
        shutdown_tx.subscribe(),
    );
    let mut server_shutdown = shutdown_tx.subscribe();

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    log::info!("listening on {}", addr);

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("failed to listen for shutdown signal: {}", e);
        }
        log::info!("shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    axum::serve(listener, routes(state))
        .with_graceful_shutdown(async move {
            let _ = server_shutdown.recv().await;
        })
        .await
        .context("server error")?;

    log::info!("server stopped");
    Ok(())
}

/// Flips expired credentials to disabled on a timer. Request-path
/// selection only reads; this task is the single writer for expiry.
fn spawn_expiry_sweep(
    store: CredentialStore,
    interval_ms: u64,
    mut shutdown: broadcast::Receiver<()>,
) {
    tokio::spawn(async move {
        // interval panics on a zero period
        let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = chrono::Utc::now().timestamp_millis();
                    match store.disable_expired(now) {
                        Ok(0) => {}
                        Ok(count) => log::info!("expiry sweep disabled {} credential(s)", count),
                        Err(e) => log::error!("expiry sweep failed: {}", e),
                    }
                }
                _ = shutdown.recv() => {
                    log::debug!("expiry sweep stopped");
                    return;
                }
            }
        }
    });
}

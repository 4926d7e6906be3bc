//! Server module
//!
//! Accept loop and connection handling for the static file server.

pub mod connection;
pub mod listener;

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use anyhow::Context;

use crate::config::AppState;
use crate::logger;

/// Run the server until interrupted.
///
/// Binds the configured address, logs the startup banner, then accepts
/// connections until Ctrl-C.
pub async fn run(state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = state
        .config
        .socket_addr()
        .context("invalid server address")?;
    let tcp_listener = listener::bind_listener(addr)
        .with_context(|| format!("failed to bind {addr}"))?;

    logger::log_server_start(&addr, &state.config);

    let connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = tcp_listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::accept_connection(stream, peer_addr, &state, &connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                logger::log_shutdown();
                return Ok(());
            }
        }
    }
}

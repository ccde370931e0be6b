// Server loop module
// Accepts connections until shutdown, then waits for open connections to finish

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::time::Instant;

use super::connection::accept_connection;
use super::signal::Shutdown;
use crate::config::AppState;
use crate::logger;

/// How long open connections may keep running after shutdown is requested
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Run the accept loop on the current `LocalSet`.
///
/// Accept errors are logged and the loop keeps going. Once `shutdown` fires
/// the listener is closed and in-flight connections get [`SHUTDOWN_GRACE`]
/// to complete.
pub async fn run_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<Shutdown>,
) -> std::io::Result<()> {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.wait() => {
                logger::log_info("Shutdown requested, no longer accepting connections");
                break;
            }
        }
    }

    drop(listener);
    drain_connections(&active_connections, SHUTDOWN_GRACE).await;
    Ok(())
}

async fn drain_connections(active: &AtomicUsize, grace: Duration) {
    let deadline = Instant::now() + grace;

    loop {
        let remaining = active.load(Ordering::SeqCst);
        if remaining == 0 {
            logger::log_info("All connections closed");
            return;
        }
        if Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Stopping with {remaining} connection(s) still open"
            ));
            return;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}

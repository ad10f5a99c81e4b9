use std::io;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::http::connection::Connection;
use crate::http::resolver::ServeRoot;

/// Why the accept loop returned.
#[derive(Debug)]
pub enum LoopExit {
    /// The running flag was cleared (or its owner went away).
    Shutdown,
    /// `accept` failed in a way that will not recover.
    Failed(io::Error),
}

/// Accepts connections until `running` turns false, handing each one to
/// its own task. The listener is dropped, and so closed, when this returns.
///
/// Handlers already spawned keep running after the loop ends.
pub async fn run(
    listener: TcpListener,
    root: Arc<ServeRoot>,
    mut running: watch::Receiver<bool>,
) -> LoopExit {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on {}", addr);
    }

    loop {
        tokio::select! {
            biased;

            changed = running.changed() => {
                if changed.is_err() || !*running.borrow() {
                    info!("Accept loop shutting down");
                    return LoopExit::Shutdown;
                }
            }

            accepted = listener.accept() => {
                match accepted {
                    Ok((socket, peer)) => {
                        debug!("Accepted connection from {}", peer);

                        let root = Arc::clone(&root);
                        tokio::spawn(async move {
                            if let Err(e) = Connection::new(socket, root).run().await {
                                debug!(peer = %peer, "Connection error: {:#}", e);
                            }
                        });
                    }
                    Err(e) if is_per_connection(&e) => {
                        debug!("Dropped connection during accept: {}", e);
                    }
                    Err(e) => {
                        error!("Error accepting connection: {}", e);
                        return LoopExit::Failed(e);
                    }
                }
            }
        }
    }
}

/// Accept errors caused by a single client rather than the listener.
fn is_per_connection(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
    )
}

//! TCP listener and accept loop

use super::config::ServerConfig;
use crate::metrics::{counters, labels};
use crate::responder::Responder;
use crate::session::{Session, SessionConfig};
use crate::Result;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tracing::Instrument;

/// First pause after a failed accept
const ACCEPT_BACKOFF_INITIAL: Duration = Duration::from_millis(10);

/// Longest pause between accept retries
const ACCEPT_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// TCP server speaking the Postgres wire protocol
///
/// Every accepted socket gets its own task running a [`Session`]. Sessions
/// share the responder and the session configuration and nothing else.
pub struct Server {
    listener: TcpListener,
    responder: Arc<dyn Responder>,
    config: Arc<SessionConfig>,
    next_conn_id: AtomicU64,
}

impl Server {
    /// Bind to `config.listen_addr`
    pub async fn bind(config: ServerConfig, responder: Arc<dyn Responder>) -> Result<Self> {
        let listener = TcpListener::bind(config.listen_addr).await?;
        Ok(Self::new(listener, config, responder))
    }

    /// Serve on an already bound listener (`listen_addr` is ignored)
    pub fn new(listener: TcpListener, config: ServerConfig, responder: Arc<dyn Responder>) -> Self {
        Self {
            listener,
            responder,
            config: Arc::new(config.session),
            next_conn_id: AtomicU64::new(1),
        }
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Accept connections until `shutdown` resolves
    ///
    /// Sessions already running keep their own tasks and finish on their own.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tracing::info!(addr = %self.local_addr()?, "listening for connections");
        tokio::pin!(shutdown);
        let mut backoff = AcceptBackoff::new();

        loop {
            let accepted = tokio::select! {
                accepted = self.listener.accept() => accepted,
                _ = &mut shutdown => break,
            };

            match accepted {
                Ok((socket, peer)) => {
                    backoff.reset();
                    self.spawn_session(socket, peer);
                }
                // Accept errors (EMFILE, aborted handshakes) are usually transient.
                Err(e) => {
                    let delay = backoff.next_delay();
                    tracing::error!(
                        error = %e,
                        retry_in_ms = delay.as_millis() as u64,
                        "failed to accept connection"
                    );
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {}
                        _ = &mut shutdown => break,
                    }
                }
            }
        }

        tracing::info!("shutdown requested, no longer accepting connections");
        Ok(())
    }

    fn spawn_session(&self, socket: TcpStream, peer: SocketAddr) {
        let conn_id = self.next_conn_id.fetch_add(1, Ordering::Relaxed);
        counters::connection_accepted();

        if let Err(e) = socket.set_nodelay(true) {
            tracing::debug!(conn_id, error = %e, "failed to set TCP_NODELAY");
        }

        let session = Session::new(socket, Arc::clone(&self.responder), Arc::clone(&self.config));
        let span = tracing::info_span!("connection", conn_id, peer = %peer);

        tokio::spawn(
            async move {
                tracing::debug!("connection accepted");
                match session.run().await {
                    Ok(()) => {
                        counters::connection_closed(labels::OUTCOME_TERMINATED);
                        tracing::debug!("connection closed");
                    }
                    Err(e) => {
                        counters::connection_closed(labels::OUTCOME_ERROR);
                        counters::session_error(e.kind());
                        if e.is_disconnect() {
                            tracing::debug!(error = %e, "client went away");
                        } else {
                            tracing::warn!(kind = %e.kind(), error = %e, "connection failed");
                        }
                    }
                }
            }
            .instrument(span),
        );
    }
}

/// Exponential delay between failed accepts, reset by the next success
#[derive(Debug)]
struct AcceptBackoff {
    next: Duration,
}

impl AcceptBackoff {
    fn new() -> Self {
        Self {
            next: ACCEPT_BACKOFF_INITIAL,
        }
    }

    fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = (self.next * 2).min(ACCEPT_BACKOFF_MAX);
        delay
    }

    fn reset(&mut self) {
        self.next = ACCEPT_BACKOFF_INITIAL;
    }
}

//! Per-connection protocol state machine

use super::response::{encode_query_response, encode_startup_response, MAX_PAYLOAD_SIZE};
use super::state::SessionState;
use super::SessionConfig;
use crate::metrics::{counters, labels};
use crate::protocol::constants::SSL_NOT_SUPPORTED;
use crate::protocol::{decode_message, decode_startup_message, FrontendMessage};
use crate::responder::Responder;
use crate::{Error, Result};
use bytes::{Buf, Bytes, BytesMut};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// What the query loop should do after handling a message
enum Flow {
    Continue,
    Terminate,
}

/// One client connection
///
/// Owns the stream for its whole life: [`Session::run`] negotiates startup,
/// serves simple queries until the client terminates or something fails,
/// and shuts the stream down on every exit path.
pub struct Session<S> {
    stream: S,
    read_buf: BytesMut,
    state: SessionState,
    responder: Arc<dyn Responder>,
    config: Arc<SessionConfig>,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Bind a session to an accepted stream
    pub fn new(stream: S, responder: Arc<dyn Responder>, config: Arc<SessionConfig>) -> Self {
        Self {
            stream,
            read_buf: BytesMut::with_capacity(8192),
            state: SessionState::AwaitingStartup,
            responder,
            config,
        }
    }

    /// Get current session state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Serve the connection to completion
    ///
    /// Returns `Ok(())` when the client sent `Terminate`. Every error is
    /// fatal: nothing more is written and the stream is closed.
    pub async fn run(mut self) -> Result<()> {
        let result = self.serve().await;
        self.close().await;
        result
    }

    async fn serve(&mut self) -> Result<()> {
        self.negotiate_startup().await?;

        loop {
            let msg = self.receive_message().await?;
            match self.handle_message(msg).await? {
                Flow::Continue => {}
                Flow::Terminate => return Ok(()),
            }
        }
    }

    /// Answer SSLRequests with `N` until a startup packet arrives
    async fn negotiate_startup(&mut self) -> Result<()> {
        let mut ssl_requests = 0;

        loop {
            match self.receive_startup_message().await? {
                FrontendMessage::SslRequest => {
                    ssl_requests += 1;
                    if ssl_requests > self.config.max_ssl_requests {
                        return Err(Error::protocol(format!(
                            "too many SSLRequests ({} allowed)",
                            self.config.max_ssl_requests
                        )));
                    }
                    tracing::debug!(attempt = ssl_requests, "refusing SSLRequest");
                    self.write_frame(&[SSL_NOT_SUPPORTED]).await?;
                    counters::ssl_refused();
                }
                FrontendMessage::Startup { version, params } => {
                    tracing::debug!(
                        major = version >> 16,
                        minor = version & 0xFFFF,
                        ?params,
                        "startup packet"
                    );
                    let frame = encode_startup_response(&self.config.banner);
                    self.write_frame(&frame).await?;
                    self.state.transition(SessionState::Ready)?;
                    tracing::info!("startup complete");
                    return Ok(());
                }
                other => {
                    return Err(Error::protocol(format!(
                        "unknown startup message: {}",
                        other.name()
                    )));
                }
            }
        }
    }

    async fn handle_message(&mut self, msg: FrontendMessage) -> Result<Flow> {
        match msg {
            FrontendMessage::Query(query) => {
                let payload = self.resolve(&query).await?;
                let frame = encode_query_response(&payload);
                self.write_frame(&frame).await?;
                Ok(Flow::Continue)
            }
            FrontendMessage::Terminate => {
                tracing::debug!("client terminated session");
                Ok(Flow::Terminate)
            }
            other => Err(Error::protocol(format!(
                "unexpected message from client: {}",
                other.name()
            ))),
        }
    }

    /// Built-in table first, responder otherwise
    async fn resolve(&mut self, query: &str) -> Result<Bytes> {
        if let Some(payload) = self.config.commands.lookup(query) {
            tracing::debug!(query, "answering built-in command");
            counters::query_answered(labels::SOURCE_BUILTIN);
            return Ok(payload.clone());
        }

        tracing::debug!(query, "delegating to responder");
        let payload = self.responder.respond().await?;
        let limit = self.config.max_payload_size.min(MAX_PAYLOAD_SIZE);
        if payload.len() > limit {
            return Err(Error::responder(format!(
                "answer of {} bytes exceeds limit of {} bytes",
                payload.len(),
                limit
            )));
        }
        counters::query_answered(labels::SOURCE_RESPONDER);
        Ok(payload)
    }

    /// Write one complete frame and flush it before the next read
    async fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.stream.write_all(frame).await?;
        self.stream.flush().await?;
        Ok(())
    }

    async fn receive_startup_message(&mut self) -> Result<FrontendMessage> {
        loop {
            if let Some((msg, consumed)) = decode_startup_message(&self.read_buf)? {
                self.read_buf.advance(consumed);
                return Ok(msg);
            }
            self.fill_buf().await?;
        }
    }

    async fn receive_message(&mut self) -> Result<FrontendMessage> {
        loop {
            if let Some((msg, consumed)) =
                decode_message(&self.read_buf, self.config.max_message_size)?
            {
                self.read_buf.advance(consumed);
                return Ok(msg);
            }
            self.fill_buf().await?;
        }
    }

    async fn fill_buf(&mut self) -> Result<()> {
        let n = self.stream.read_buf(&mut self.read_buf).await?;
        if n == 0 {
            return Err(Error::ConnectionClosed);
        }
        Ok(())
    }

    async fn close(&mut self) {
        if let Err(e) = self.state.transition(SessionState::Closed) {
            tracing::debug!(error = %e, "session already closed");
            return;
        }
        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(error = %e, "stream shutdown failed");
        }
    }
}

//! Error types for pg-fortune

use std::fmt;
use std::io;
use thiserror::Error;

/// Main error type
///
/// Every variant is fatal to the connection that produced it. The server
/// logs it and drops the socket; clients never see an error reply.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed, unexpected, or unsupported protocol message
    #[error("protocol error: {0}")]
    Protocol(String),

    /// I/O error on the client socket
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Peer closed the socket before sending Terminate
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// Injected responder failed to produce an answer
    #[error("responder error: {0}")]
    Responder(String),

    /// Session state machine violation
    #[error("invalid state: expected {expected}, got {actual}")]
    InvalidState {
        /// Expected state
        expected: String,
        /// Actual state
        actual: String,
    },

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Broad classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Peer sent something the server does not accept
    Protocol,
    /// Socket read/write failure or early disconnect
    Transport,
    /// Responder capability failed
    Responder,
    /// Bad configuration value
    Config,
}

impl ErrorKind {
    /// Stable lowercase name, used as a log field and metric label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Protocol => "protocol",
            Self::Transport => "transport",
            Self::Responder => "responder",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Wrap a responder failure
    pub fn responder(err: impl fmt::Display) -> Self {
        Self::Responder(err.to_string())
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Protocol(_) | Self::InvalidState { .. } => ErrorKind::Protocol,
            Self::Io(_) | Self::ConnectionClosed => ErrorKind::Transport,
            Self::Responder(_) => ErrorKind::Responder,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// True when the peer simply went away
    pub fn is_disconnect(&self) -> bool {
        match self {
            Self::ConnectionClosed => true,
            Self::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::UnexpectedEof
            ),
            _ => false,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

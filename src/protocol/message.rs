//! Protocol message types

use super::constants::{CANCEL_REQUEST_CODE, GSSENC_REQUEST_CODE};
use bytes::Bytes;
use std::fmt;

/// Frontend message (client → server)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontendMessage {
    /// Startup message
    Startup {
        /// Protocol version
        version: i32,
        /// Connection parameters (decoded, never interpreted)
        params: Vec<(String, String)>,
    },

    /// SSLRequest message (TLS negotiation)
    SslRequest,

    /// Simple query message
    Query(String),

    /// Terminate message
    Terminate,

    /// Any message the server does not handle
    Unrecognized(UnrecognizedMessage),
}

impl FrontendMessage {
    /// Short name used in logs and protocol errors
    pub fn name(&self) -> String {
        match self {
            Self::Startup { .. } => "StartupMessage".into(),
            Self::SslRequest => "SSLRequest".into(),
            Self::Query(_) => "Query".into(),
            Self::Terminate => "Terminate".into(),
            Self::Unrecognized(msg) => msg.to_string(),
        }
    }
}

/// Identity of a message outside the supported subset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnrecognizedMessage {
    /// Untagged startup-phase packet with an unknown request code
    StartupCode(i32),
    /// Tagged message with an unsupported type byte
    Tag(u8),
}

impl fmt::Display for UnrecognizedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::StartupCode(CANCEL_REQUEST_CODE) => write!(f, "CancelRequest"),
            Self::StartupCode(GSSENC_REQUEST_CODE) => write!(f, "GSSENCRequest"),
            Self::StartupCode(code) => {
                write!(f, "startup packet with code {} ({}.{})", code, code >> 16, code & 0xFFFF)
            }
            Self::Tag(tag) if tag.is_ascii_graphic() => {
                write!(f, "message type '{}'", tag as char)
            }
            Self::Tag(tag) => write!(f, "message type 0x{:02X}", tag),
        }
    }
}

/// Backend message (server → client)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendMessage {
    /// AuthenticationOk
    AuthenticationOk,

    /// Notice response
    NoticeResponse(NoticeFields),

    /// Ready for query
    ReadyForQuery {
        /// Transaction status
        status: u8,
    },

    /// Row description
    RowDescription(Vec<FieldDescription>),

    /// Data row (`None` is SQL NULL)
    DataRow(Vec<Option<Bytes>>),

    /// Command complete
    CommandComplete(String),
}

/// Field description (column metadata)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescription {
    /// Column name
    pub name: String,
    /// Table OID (0 if not a table column)
    pub table_oid: i32,
    /// Column attribute number (0 if not a table column)
    pub column_attr: i16,
    /// Data type OID
    pub type_oid: u32,
    /// Data type size (-1 for variable length)
    pub type_size: i16,
    /// Type modifier
    pub type_modifier: i32,
    /// Format code (0 = text, 1 = binary)
    pub format_code: i16,
}

/// Notice fields
///
/// Only fields that are set get encoded. A notice carrying just a message is
/// printed verbatim by `psql`, which is how the startup banner is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeFields {
    /// Severity (NOTICE, INFO, ...)
    pub severity: Option<String>,
    /// SQLSTATE code
    pub code: Option<String>,
    /// Human-readable message
    pub message: Option<String>,
    /// Additional detail
    pub detail: Option<String>,
    /// Hint
    pub hint: Option<String>,
}

impl NoticeFields {
    /// Notice with only a message
    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            message: Some(msg.into()),
            ..Default::default()
        }
    }
}

impl fmt::Display for NoticeFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref severity) = self.severity {
            write!(f, "{}: ", severity)?;
        }
        if let Some(ref msg) = self.message {
            write!(f, "{}", msg)?;
        }
        if let Some(ref code) = self.code {
            write!(f, " ({})", code)?;
        }
        Ok(())
    }
}

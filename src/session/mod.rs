//! Connection sessions
//!
//! This module handles:
//! * Startup negotiation (TLS refusal, startup reply with banner)
//! * The simple-query loop and dispatch to built-in commands or the responder
//! * Encoding of the fixed single-row, single-column result frame
//! * State machine enforcement

mod conn;
mod response;
mod state;

pub use conn::Session;
pub use response::{
    encode_query_response, encode_startup_response, output_field, COMMAND_TAG, MAX_PAYLOAD_SIZE,
    OUTPUT_COLUMN,
};
pub use state::SessionState;

use crate::console::{Banner, CommandTable};
use crate::protocol::constants::DEFAULT_MAX_MESSAGE_SIZE;

/// Default bound on SSLRequests answered before a startup packet
pub const DEFAULT_MAX_SSL_REQUESTS: usize = 8;

/// Settings shared by every session of a server
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// SSLRequests refused before the connection is dropped
    pub max_ssl_requests: usize,
    /// Largest accepted frontend message, in bytes
    pub max_message_size: usize,
    /// Largest responder answer, in bytes (at most [`MAX_PAYLOAD_SIZE`])
    pub max_payload_size: usize,
    /// Notices sent after startup
    pub banner: Banner,
    /// Built-in commands
    pub commands: CommandTable,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_ssl_requests: DEFAULT_MAX_SSL_REQUESTS,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            max_payload_size: MAX_PAYLOAD_SIZE,
            banner: Banner::default(),
            commands: CommandTable::default(),
        }
    }
}

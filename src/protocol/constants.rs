//! Postgres protocol constants

/// Major protocol version accepted in startup packets
pub const PROTOCOL_MAJOR_VERSION: i32 = 3;

/// Protocol version 3.0
pub const PROTOCOL_VERSION: i32 = 0x0003_0000;

/// SSLRequest code (80877103 = 1234 << 16 | 5679)
pub const SSL_REQUEST_CODE: i32 = 0x04D2_162F;

/// GSSENCRequest code (80877104 = 1234 << 16 | 5680)
pub const GSSENC_REQUEST_CODE: i32 = 0x04D2_1630;

/// CancelRequest code (80877102 = 1234 << 16 | 5678)
pub const CANCEL_REQUEST_CODE: i32 = 0x04D2_162E;

/// Single-byte reply refusing an SSLRequest
pub const SSL_NOT_SUPPORTED: u8 = b'N';

/// Largest startup packet the server will buffer, matching PostgreSQL's
/// `MAX_STARTUP_PACKET_LENGTH`
pub const MAX_STARTUP_PACKET_LENGTH: usize = 10_000;

/// Default upper bound for a regular message (16 MB)
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Frontend (client → server) message type tags
pub mod frontend {
    /// Simple query
    pub const QUERY: u8 = b'Q';

    /// Terminate
    pub const TERMINATE: u8 = b'X';
}

/// Backend (server → client) message type tags
pub mod tags {
    /// Authentication request
    pub const AUTHENTICATION: u8 = b'R';

    /// Command complete
    pub const COMMAND_COMPLETE: u8 = b'C';

    /// Data row
    pub const DATA_ROW: u8 = b'D';

    /// Notice response
    pub const NOTICE_RESPONSE: u8 = b'N';

    /// Ready for query
    pub const READY_FOR_QUERY: u8 = b'Z';

    /// Row description
    pub const ROW_DESCRIPTION: u8 = b'T';
}

/// Authentication types
pub mod auth {
    /// Authentication successful
    pub const OK: i32 = 0;
}

/// Transaction status
pub mod tx_status {
    /// Idle (not in transaction)
    pub const IDLE: u8 = b'I';
}

/// Type OIDs from `pg_type`
pub mod type_oid {
    /// `text`
    pub const TEXT: u32 = 25;
}

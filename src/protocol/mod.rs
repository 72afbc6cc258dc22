//! Postgres wire protocol (server side)
//!
//! This module handles:
//! * Decoding the frontend messages the server understands (startup packets,
//!   simple queries, terminate) and tagging everything else as unrecognized
//! * Encoding the backend messages the server sends
//!
//! Only the subset of protocol v3.0 needed to answer simple queries is covered.

pub mod constants;
pub mod decode;
pub mod encode;
pub mod message;

pub use decode::{decode_message, decode_startup_message};
pub use encode::encode_message;
pub use message::{
    BackendMessage, FieldDescription, FrontendMessage, NoticeFields, UnrecognizedMessage,
};

//! TCP server
//!
//! This module handles:
//! * Server configuration (builder and `PG_FORTUNE_*` environment variables)
//! * Binding the listener and spawning one session task per connection

mod config;
mod listener;

pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_LISTEN_ADDR, ENV_LISTEN, ENV_MAX_MESSAGE_SIZE,
    ENV_MAX_SSL_REQUESTS, ENV_QUIET,
};
pub use listener::Server;

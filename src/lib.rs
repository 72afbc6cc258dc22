//! pg-fortune: a tiny server that speaks the Postgres wire protocol
//!
//! Any Postgres client (`psql`, drivers, GUI tools) can connect without TLS or
//! authentication, read a banner of notices, and send simple queries. A few
//! built-in commands answer with fixed text. Everything else is answered by a
//! pluggable [`responder::Responder`], by default a random fortune.
//!
//! Every answer is one row with one text column named `Output`.
//!
//! # Examples
//!
//! ```no_run
//! use pg_fortune::responder::FortuneResponder;
//! use pg_fortune::server::{Server, ServerConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> pg_fortune::Result<()> {
//! let config = ServerConfig::builder()
//!     .listen_addr("127.0.0.1:6875".parse().unwrap())
//!     .build();
//!
//! let server = Server::bind(config, Arc::new(FortuneResponder::default())).await?;
//! server.serve().await
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms)]

pub mod console;
pub mod error;
pub mod metrics;
pub mod protocol;
pub mod responder;
pub mod server;
pub mod session;

pub use error::{Error, ErrorKind, Result};

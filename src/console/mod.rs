//! Console content
//!
//! The banner and the built-in command table are plain data handed to every
//! session. Replacing them changes what clients see, never how the protocol
//! behaves.

mod banner;
mod commands;

pub use banner::Banner;
pub use commands::{CommandTable, CommandTableBuilder, HELP_COMMAND};

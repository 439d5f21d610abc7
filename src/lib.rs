//! Drives an MCP server through a tool call that needs elicitation.
//!
//! The server is spawned as a child process and spoken to with
//! newline-delimited JSON-RPC 2.0 over its stdin/stdout.

mod config;
mod console;
mod driver;
mod error;
mod process;
mod session;
#[cfg(test)]
mod tests;
pub mod transport;
pub mod types;

pub use config::{Config, DEFAULT_PROTOCOL_VERSION, DEFAULT_SERVER_PATH};
pub use console::{Captured, Console};
pub use driver::{Driver, Outcome, Step};
pub use error::{Error, Result};
pub use process::ServerProcess;
pub use session::{Report, drive, run, run_until};

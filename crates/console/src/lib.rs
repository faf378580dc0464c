//! Rudimentary single-line developer console.
//!
//! The console owns a line editor, a command history, and a scrollback log.
//! Parsing produces typed [`Command`]s; applying them is the host's job.

pub mod command;
pub mod console;

pub use command::{Command, ParseError, parse};
pub use console::Console;

pub fn crate_info() -> &'static str {
    "walkabout-console v0.1.0"
}

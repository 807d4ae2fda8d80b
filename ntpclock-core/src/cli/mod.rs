//! Serial command line
//!
//! A small line-oriented console for inspecting and changing the clock
//! configuration. Lines are collected by [`LineEditor`], parsed into a
//! [`Command`] and run against a [`CliContext`]. Anything that needs flash
//! or network access comes back as a [`CliAction`] for the caller.

pub mod command;
pub mod exec;
pub mod line;

pub use command::{parse, CliError, Command, COMMAND_NAMES};
pub use exec::{execute, CliAction, CliContext};
pub use line::{Input, LineEditor, LINE_LEN};

/// Banner printed when a session opens
pub const HELLO: &str = "** NTP clock **";

/// Prompt printed before each command
pub const PROMPT: &str = "> ";

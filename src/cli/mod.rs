//! Command-line interface: process arguments and shell commands.

pub mod args;
pub mod command;

pub use args::Args;
pub use command::{parse_command, Input, ShellCommand};

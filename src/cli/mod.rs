//! CLI module for recordgate
//!
//! Provides command-line interface for:
//! - serve: start the HTTP server
//! - query: one-shot list from stdin
//! - columns: print a resource's live columns

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{columns, query, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_json};

//! CLI argument definitions using clap
//!
//! Commands:
//! - recordgate serve --config <path>
//! - recordgate query --config <path> --resource <name> --caller-id <id> [--admin]
//! - recordgate columns --config <path> --resource <name>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// recordgate - owner-scoped filtering, sorting and pagination
#[derive(Parser, Debug)]
#[command(name = "recordgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./recordgate.json")]
        config: PathBuf,
    },

    /// Read a query request from stdin, print one page as JSON
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./recordgate.json")]
        config: PathBuf,

        /// Resource name, e.g. `invoice`
        #[arg(long)]
        resource: String,

        /// Id of the caller the query runs as
        #[arg(long)]
        caller_id: i64,

        /// Run as a privileged caller (no ownership scoping)
        #[arg(long)]
        admin: bool,
    },

    /// Print the live columns of a resource
    Columns {
        /// Path to configuration file
        #[arg(long, default_value = "./recordgate.json")]
        config: PathBuf,

        #[arg(long)]
        resource: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

//! CLI argument definitions using clap
//!
//! Commands:
//! - schemata validate --config <path> --schema <id> --version <v> [--input <file>]
//! - schemata check --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// schemata - declarative validation and coercion of JSON input
#[derive(Parser, Debug)]
#[command(name = "schemata")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate one JSON document against a registered schema
    Validate {
        /// Path to configuration file
        #[arg(long, default_value = "./schemata.json")]
        config: PathBuf,

        /// Schema identifier
        #[arg(long)]
        schema: String,

        /// Schema version
        #[arg(long = "version", value_name = "VERSION")]
        schema_version: String,

        /// Read the document from a file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Load every schema document and report what is registered
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./schemata.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

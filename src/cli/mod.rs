//! Command-line interface
//!
//! - validate: check one JSON document against a registered schema
//! - check: load the schema directory and list what is registered

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{boot, check, run, run_command, validate, validate_document, Runtime};
pub use errors::{CliError, CliResult};
pub use io::{read_request, read_request_from, write_error, write_response};

//! schemata CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`. Errors are already
//! written as a JSON response on stdout; they are repeated on stderr and the
//! process exits non-zero.

use schemata::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

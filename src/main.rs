//! gfaio CLI
//!
//! A command-line tool for inspecting, validating, and rewriting GFA files.

use gfaio::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

//! pkgmeta CLI entry point
//!
//! Parses arguments, runs the query and maps the outcome to an exit status:
//! errors are printed with context and exit 1, failed predicates
//! (`--exists` and friends) exit 1 silently.

use clap::Parser;
use pkgmeta_cli::cli;
use pkgmeta_cli::core::user_friendly_error;

fn main() {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}

//! kubeboot CLI entry point
//!
//! Parses arguments, runs the command and reports errors. Exit status is 1
//! for ordinary failures and 2 when a bundled template is defective.

use clap::Parser;
use kubeboot::cli;
use kubeboot::core::{ManifestError, user_friendly_error};

fn main() {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = cli.execute() {
        let fatal = e.downcast_ref::<ManifestError>().is_some_and(ManifestError::is_fatal);
        user_friendly_error(e).display();
        std::process::exit(if fatal { 2 } else { 1 });
    }
}

//! repokit command-line entry point

use clap::Parser;
use repokit_cli::cli;
use repokit_cli::core::user_friendly_error;

fn main() {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    if let Err(e) = cli.execute() {
        // Convert to user-friendly error with context and suggestions
        let error_ctx = user_friendly_error(e);
        error_ctx.display();
        std::process::exit(1);
    }
}

//! CLI module for ragdesk.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version and usage display
//! - The headless connection test
//!
//! # Usage
//!
//! ```ignore
//! use ragdesk::cli::{parse_args, run_cli_command, CliCommand};
//!
//! let command = parse_args(std::env::args());
//! if let Some(result) = run_cli_command(command.clone()) {
//!     // a CLI-only command ran
//! }
//! ```

pub mod args;
pub mod check;
pub mod version;

pub use args::{parse_args, CliCommand, CliOptions};
pub use check::handle_check_command;
pub use version::{handle_help_command, handle_version_command, USAGE, VERSION};

use color_eyre::eyre::eyre;
use color_eyre::Result;

/// Run the commands that need no runtime.
///
/// # Returns
///
/// * `None` - `Check` and `RunTui` are left to the caller
/// * `Some(Err(e))` - The arguments were invalid
///
/// `Version` and `Help` print and exit.
pub fn run_cli_command(command: CliCommand) -> Option<Result<()>> {
    match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => handle_help_command(),
        CliCommand::Invalid(message) => Some(Err(eyre!("{}\n\n{}", message, USAGE))),
        CliCommand::Check(_) | CliCommand::RunTui(_) => None,
    }
}

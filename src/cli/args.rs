//! Command-line argument parsing for ragdesk.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

use crate::startup::config::ClientConfig;

/// Options that override the environment configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    /// `--api-base <url>`
    pub api_base: Option<String>,
    /// `--session <id>`
    pub session: Option<String>,
}

impl CliOptions {
    /// Apply the flags on top of `config`.
    pub fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(base) = &self.api_base {
            config = config.with_base_url(base);
        }
        if let Some(session) = &self.session {
            config = config.with_session_id(session);
        }
        config
    }
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Run the connection test and exit
    Check(CliOptions),
    /// Run the TUI application (default)
    RunTui(CliOptions),
    /// Arguments could not be parsed
    Invalid(String),
}

/// Parse command-line arguments and return the appropriate command.
///
/// The first item is the program name. `--version` and `--help` win over
/// everything else; unknown flags are rejected.
///
/// # Examples
///
/// ```
/// use ragdesk::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["ragdesk".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut options = CliOptions::default();
    let mut check = false;
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };

        match flag.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--check" => check = true,
            "--api-base" | "--session" => {
                let Some(value) = inline.or_else(|| args.next()) else {
                    return CliCommand::Invalid(format!("{} requires a value", flag));
                };
                if flag == "--api-base" {
                    options.api_base = Some(value);
                } else {
                    options.session = Some(value);
                }
            }
            other => return CliCommand::Invalid(format!("Unknown argument: {}", other)),
        }
    }

    if check {
        CliCommand::Check(options)
    } else {
        CliCommand::RunTui(options)
    }
}

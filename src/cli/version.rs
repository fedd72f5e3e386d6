//! Version and usage output.

/// The current version of ragdesk, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Usage text for `--help`.
pub const USAGE: &str = "\
Terminal client for a retrieval-augmented-generation document service

Usage: ragdesk [OPTIONS]

Options:
      --api-base <URL>  API base URL [env: RAGDESK_API_BASE] [default: http://localhost:8080/api]
      --session <ID>    Initial session id [env: RAGDESK_SESSION]
      --check           Test the backend connection and exit
  -h, --help            Print help
  -V, --version         Print version

Logs go to <data dir>/ragdesk/ragdesk.log; set RAGDESK_LOG to change the filter.";

/// Handle the --version command.
pub fn handle_version_command() -> ! {
    println!("ragdesk {}", VERSION);
    std::process::exit(0)
}

/// Handle the --help command.
pub fn handle_help_command() -> ! {
    println!("{}", USAGE);
    std::process::exit(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_format() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
    }

    #[test]
    fn test_usage_lists_every_flag() {
        for flag in ["--api-base", "--session", "--check", "--help", "--version"] {
            assert!(USAGE.contains(flag), "missing {}", flag);
        }
    }
}

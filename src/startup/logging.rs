//! Tracing initialization.
//!
//! The terminal UI owns stdout, so log lines go to a file under the user's
//! data directory.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter directives.
pub const ENV_LOG: &str = "RAGDESK_LOG";

/// Filter used when `RAGDESK_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "ragdesk=info";

/// Default log file location: `<data dir>/ragdesk/ragdesk.log`.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("ragdesk").join("ragdesk.log"))
}

/// Build the filter from `RAGDESK_LOG`, falling back to [`DEFAULT_FILTER`].
pub fn build_filter(directives: Option<&str>) -> EnvFilter {
    match directives.map(str::trim).filter(|d| !d.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        None => EnvFilter::new(DEFAULT_FILTER),
    }
}

/// Install the global subscriber writing to `path`.
///
/// Returns the path in use, or `None` when logging stays disabled because
/// the file cannot be opened or a subscriber is already installed.
pub fn init_logging(path: Option<PathBuf>) -> Option<PathBuf> {
    let path = path.or_else(default_log_path)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    let directives = std::env::var(ENV_LOG).ok();
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(build_filter(directives.as_deref()))
        .try_init()
        .ok()?;

    tracing::info!("ragdesk v{} logging to {}", env!("CARGO_PKG_VERSION"), path.display());
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_path_file_name() {
        if let Some(path) = default_log_path() {
            assert!(path.ends_with("ragdesk/ragdesk.log"));
        }
    }

    #[test]
    fn test_build_filter_fallbacks() {
        assert_eq!(build_filter(None).to_string(), DEFAULT_FILTER);
        assert_eq!(build_filter(Some("  ")).to_string(), DEFAULT_FILTER);
        assert_eq!(build_filter(Some("ragdesk=debug")).to_string(), "ragdesk=debug");
    }
}

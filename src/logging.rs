//! Log setup. The terminal belongs to the UI, so events go to a file under
//! the data directory.
//!
//! Filter priority: `KEYTRAIL_LOG`, then `RUST_LOG`, then `--verbose`
//! (debug) or the default `warn`.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

pub const LOG_ENV: &str = "KEYTRAIL_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Normal,
    Verbose,
}

impl Verbosity {
    pub const fn from_flag(verbose: bool) -> Self {
        if verbose { Self::Verbose } else { Self::Normal }
    }

    pub const fn default_level(self) -> Level {
        match self {
            Self::Normal => Level::WARN,
            Self::Verbose => Level::DEBUG,
        }
    }
}

pub fn default_log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("keytrail")
        .join("keytrail.log")
}

/// Installs the global subscriber writing to `path`. Call once, before the
/// terminal switches to raw mode.
pub fn init(verbosity: Verbosity, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::options().create(true).append(true).open(path)?;

    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_env_filter(verbosity))
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

fn build_env_filter(verbosity: Verbosity) -> EnvFilter {
    if let Some(filter) = std::env::var(LOG_ENV)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
    {
        return filter;
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = verbosity.default_level();
    let directive = match verbosity {
        Verbosity::Verbose => format!("{level},keytrail=debug"),
        Verbosity::Normal => level.to_string(),
    };
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_from_flag() {
        assert_eq!(Verbosity::from_flag(false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flag(true), Verbosity::Verbose);
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(Verbosity::Normal.default_level(), Level::WARN);
        assert_eq!(Verbosity::Verbose.default_level(), Level::DEBUG);
    }

    #[test]
    fn test_default_log_path_is_in_app_dir() {
        let path = default_log_path();
        assert!(path.ends_with("keytrail/keytrail.log"));
    }
}

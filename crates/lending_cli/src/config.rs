//! Effective runtime settings derived from flags and environment.

use crate::cli::Cli;
use anyhow::{Context, Result};
use lending_core::LogLevel;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub log_level: LogLevel,
    /// Absolute; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to resolve current directory")?;
        Ok(Self::resolve(cli, &cwd))
    }

    fn resolve(cli: &Cli, cwd: &Path) -> Self {
        Self {
            db_path: cli.db.clone(),
            log_level: cli.log_level.unwrap_or_else(LogLevel::default_for_build),
            log_dir: cli.log_dir.as_ref().map(|dir| {
                if dir.is_absolute() {
                    dir.clone()
                } else {
                    cwd.join(dir)
                }
            }),
        }
    }
}

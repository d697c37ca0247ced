use std::env::VarError;
use std::path::PathBuf;

use anyhow::anyhow;

pub const DEFAULT_LOG_FILTER: &str = "info";

pub struct Config {
    /// Workspace opened before the first request, if set.
    pub workspace: Option<PathBuf>,
    pub log_filter: String,
}

impl Config {
    pub fn env() -> anyhow::Result<Self> {
        let workspace = optional_env("SCHOOLD_WORKSPACE")?
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        let log_filter = optional_env("SCHOOLD_LOG")?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            workspace,
            log_filter,
        })
    }
}

fn optional_env(name: &str) -> anyhow::Result<Option<String>> {
    match std::env::var(name) {
        Ok(v) => Ok(Some(v)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(anyhow!("{name} value is not valid unicode")),
    }
}

//! Runtime settings resolved from flags, environment and defaults.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

pub const DEFAULT_DATA_FILE: &str = "tasks.json";
pub const DEFAULT_WINDOW_DAYS: i64 = 3;
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// JSON file holding the task list.
    pub data_file: PathBuf,
    /// How many days ahead the deadline reminder looks.
    pub window_days: i64,
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            window_days: DEFAULT_WINDOW_DAYS,
            log_filter: None,
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            data_file: cli.file.clone(),
            window_days: cli.window_days,
            log_filter: cli.log_level.clone(),
        }
    }

    /// `--log-level` wins, then `RUST_LOG`, then warnings only.
    pub fn env_filter(&self) -> EnvFilter {
        match &self.log_filter {
            Some(filter) => EnvFilter::try_new(filter)
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["todolist", "list"]).unwrap();
        let config = Config::from_cli(&cli);
        // env vars may override in a developer shell, so only check when unset
        if std::env::var_os("TODOLIST_FILE").is_none() {
            assert_eq!(config.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        }
        if std::env::var_os("TODOLIST_WINDOW_DAYS").is_none() {
            assert_eq!(config.window_days, DEFAULT_WINDOW_DAYS);
        }
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "todolist",
            "--file",
            "/tmp/school.json",
            "--window-days",
            "7",
            "--log-level",
            "debug",
            "list",
        ])
        .unwrap();
        let config = Config::from_cli(&cli);
        assert_eq!(config.data_file, PathBuf::from("/tmp/school.json"));
        assert_eq!(config.window_days, 7);
        assert_eq!(config.log_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn test_bad_log_filter_falls_back() {
        let config = Config {
            log_filter: Some("todolist=loud".to_string()),
            ..Config::default()
        };
        assert_eq!(config.env_filter().to_string(), DEFAULT_LOG_FILTER);
    }
}

//! Environment-backed settings.
//!
//! The launcher takes no command-line flags, so [`AppConfig`] is parsed from the
//! program name alone and every value comes from the environment or a default.

mod validation;

use clap::Parser;
use std::path::PathBuf;

use crate::launcher::DeletePolicy;

/// Store location used when `QUICK_COMMAND_STORE` is unset, relative to the working directory.
pub const DEFAULT_STORE_PATH: &str = "config.json";

/// Launcher settings.
#[derive(Debug, Parser, Clone)]
#[command(about = "quick-command launcher", author, version)]
pub struct AppConfig {
    /// JSON file holding the launcher entries
    #[arg(long = "store", env = "QUICK_COMMAND_STORE", default_value = DEFAULT_STORE_PATH)]
    pub store_path: PathBuf,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "QUICK_COMMAND_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides QUICK_COMMAND_LOGS)
    #[arg(long = "no-logs", env = "QUICK_COMMAND_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Allow entry names and command lines in the debug log
    #[arg(
        long = "log-content",
        env = "QUICK_COMMAND_LOG_CONTENT",
        default_value_t = false
    )]
    pub log_content: bool,

    /// Delete every entry equal to the selected one instead of just the selected entry
    #[arg(
        long = "delete-matching",
        env = "QUICK_COMMAND_DELETE_MATCHING",
        default_value_t = false
    )]
    pub delete_matching: bool,
}

impl AppConfig {
    pub fn logging_enabled(&self) -> bool {
        self.logs && !self.no_logs
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        if self.delete_matching {
            DeletePolicy::Matching
        } else {
            DeletePolicy::Identity
        }
    }
}

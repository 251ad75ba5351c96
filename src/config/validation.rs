use super::AppConfig;
use anyhow::{bail, Result};
use clap::Parser;

impl AppConfig {
    /// Build the config from the environment only and validate it.
    pub fn from_env() -> Result<Self> {
        let config = Self::try_parse_from([env!("CARGO_PKG_NAME")])?;
        config.validate()?;
        Ok(config)
    }

    /// Reject store paths that can never be written.
    pub fn validate(&self) -> Result<()> {
        if self.store_path.as_os_str().is_empty() {
            bail!("QUICK_COMMAND_STORE must not be empty");
        }
        if self.store_path.is_dir() {
            bail!(
                "QUICK_COMMAND_STORE points at a directory: {}",
                self.store_path.display()
            );
        }
        if self.store_path.file_name().is_none() {
            bail!(
                "QUICK_COMMAND_STORE must name a file, got {}",
                self.store_path.display()
            );
        }
        Ok(())
    }
}

//! quick-command entrypoint.
//!
//! Loads the entry store (fatal on failure, before the UI starts), runs the
//! launcher, and after an execute request hands the released terminal to the
//! chosen command. The session never resumes once a command has run.

use anyhow::{Context, Result};
use quick_command::{
    config::AppConfig,
    init_logging, log_debug, log_debug_content, log_file_path,
    store::EntryStore,
    ui::{self, SessionEnd},
    AppState,
};

fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    init_logging(&config);
    log_debug("=== quick-command started ===");
    log_debug(&format!("Log file: {:?}", log_file_path()));

    let mut store = EntryStore::load(&config.store_path)
        .with_context(|| format!("cannot open entry store {}", config.store_path.display()))?;
    log_debug(&format!("loaded {} entries", store.len()));

    let mut state = AppState::new(&store).with_delete_policy(config.delete_policy());
    let end = ui::run_app(&mut state, &mut store);

    match end {
        Ok(SessionEnd::Quit) => {
            log_debug("=== quick-command exiting ===");
            Ok(())
        }
        Ok(SessionEnd::Execute(command)) => {
            println!("> {command}");
            log_debug_content(&format!("running: {command}"));
            let status = command.run()?;
            log_debug(&format!("command finished: {status}"));
            Ok(())
        }
        Err(err) => {
            log_debug(&format!("Exit with error: {err:#}"));
            Err(err)
        }
    }
}

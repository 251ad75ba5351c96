//! Interaction controller for the launcher: modal key handling over a
//! filtered, persisted list of commands.

mod logging;
mod state;

#[cfg(test)]
pub(crate) use logging::set_logging_for_tests;
pub use logging::{
    crash_log_path, init_logging, log_debug, log_debug_content, log_file_path, log_panic,
};
pub use state::{visible_window, AppState, DeletePolicy, Field, FieldBuffers, Mode, Outcome};

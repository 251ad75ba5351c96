pub mod config;
pub mod executor;
pub mod filter;
pub mod input;
pub mod store;
mod telemetry;
pub mod terminal_restore;
pub mod ui;
pub mod utf8_safe;

mod launcher;

pub use launcher::*;

use crate::config::AppConfig;
use crate::telemetry::init_tracing;
use std::{
    env, fs,
    io::Write,
    panic,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
    time::{SystemTime, UNIX_EPOCH},
};

const LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;
const CRASH_LOG_MAX_BYTES: u64 = 256 * 1024;
static LOG_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_CONTENT_ENABLED: AtomicBool = AtomicBool::new(false);
static DEBUG_LOG: Mutex<Option<CappedLog>> = Mutex::new(None);

/// Debug log location. The terminal is owned by the UI, so logs go to a file.
pub fn log_file_path() -> PathBuf {
    env::temp_dir().join(log_file_name("quick_command"))
}

/// Crash log location (metadata only unless content logging is on).
pub fn crash_log_path() -> PathBuf {
    env::temp_dir().join(log_file_name("quick_command_crash"))
}

#[cfg(not(test))]
fn log_file_name(stem: &str) -> String {
    format!("{stem}.log")
}

// Unit tests write next to, never over, a user's real logs.
#[cfg(test)]
fn log_file_name(stem: &str) -> String {
    format!("{stem}_test_{}.log", std::process::id())
}

/// Append-only file that starts over once it would grow past `max_bytes`.
struct CappedLog {
    path: PathBuf,
    file: fs::File,
    max_bytes: u64,
    len: u64,
}

impl CappedLog {
    fn open(path: PathBuf, max_bytes: u64) -> Option<Self> {
        let len = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        let (file, len) = if len > max_bytes {
            (truncate(&path).ok()?, 0)
        } else {
            (append(&path).ok()?, len)
        };
        Some(Self {
            path,
            file,
            max_bytes,
            len,
        })
    }

    fn write_line(&mut self, line: &str) {
        let add = line.len() as u64;
        if self.len.saturating_add(add) > self.max_bytes {
            if let Ok(file) = truncate(&self.path) {
                self.file = file;
                self.len = 0;
            }
        }
        if self.file.write_all(line.as_bytes()).is_ok() {
            self.len = self.len.saturating_add(add);
        }
    }
}

fn append(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new().create(true).append(true).open(path)
}

fn truncate(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn set_enabled(enabled: bool, content_enabled: bool) {
    LOG_ENABLED.store(enabled, Ordering::Relaxed);
    LOG_CONTENT_ENABLED.store(enabled && content_enabled, Ordering::Relaxed);

    let mut log = DEBUG_LOG
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *log = enabled
        .then(|| CappedLog::open(log_file_path(), LOG_MAX_BYTES))
        .flatten();
}

/// Configure file logging and structured tracing from the environment-backed config.
pub fn init_logging(config: &AppConfig) {
    let enabled = config.logging_enabled();
    set_enabled(enabled, config.log_content);
    if enabled {
        init_tracing();
    }
}

/// Append a timestamped line to the debug log, if logging is enabled.
pub fn log_debug(msg: &str) {
    if !LOG_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let line = format!("[{}] {msg}\n", unix_seconds());
    let mut log = DEBUG_LOG
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(log) = log.as_mut() {
        log.write_line(&line);
    }
}

/// Log a message that contains entry names or command lines.
pub fn log_debug_content(msg: &str) {
    if LOG_CONTENT_ENABLED.load(Ordering::Relaxed) {
        log_debug(msg);
    }
}

fn panic_message(info: &panic::PanicHookInfo<'_>) -> String {
    if !LOG_CONTENT_ENABLED.load(Ordering::Relaxed) {
        return "panic payload omitted (log-content disabled)".to_string();
    }
    let payload = info.payload();
    payload
        .downcast_ref::<&str>()
        .map(|text| (*text).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

/// Record a panic in the crash log while logging is on.
pub fn log_panic(info: &panic::PanicHookInfo<'_>) {
    if !LOG_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let location = info
        .location()
        .map(|loc| format!("{}:{}", loc.file(), loc.line()))
        .unwrap_or_else(|| "unknown".to_string());
    let line = format!(
        "[{}] panic at {location}: {} (v{})\n",
        unix_seconds(),
        panic_message(info),
        env!("CARGO_PKG_VERSION")
    );
    if let Some(mut crash_log) = CappedLog::open(crash_log_path(), CRASH_LOG_MAX_BYTES) {
        crash_log.write_line(&line);
    }
}

#[cfg(test)]
pub(crate) fn set_logging_for_tests(enabled: bool, content_enabled: bool) {
    set_enabled(enabled, content_enabled);
}

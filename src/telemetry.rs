use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Once;
use tracing_subscriber::fmt::time::UtcTime;

static TRACING_INIT: Once = Once::new();

fn trace_log_path() -> PathBuf {
    env::var_os("QUICK_COMMAND_TRACE_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("quick_command_trace.jsonl"))
}

/// Send store and executor events to a JSON-lines file. Only the first call installs.
pub(crate) fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let Ok(file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(trace_log_path())
        else {
            return;
        };
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_timer(UtcTime::rfc_3339())
            .with_writer(file)
            .with_current_span(false)
            .with_span_list(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

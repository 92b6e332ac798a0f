//! Logging initialization: human-readable format (timestamp, level, target, message, fields) to both console and file.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{
    fmt::format::{FmtSpan, Writer},
    fmt::time::FormatTime,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Server-local time in `YYYY-MM-DD HH:MM:SS` for log lines.
struct ChronoLocal;

impl FormatTime for ChronoLocal {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let t = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        write!(w, "{} ", t)
    }
}

/// Initializes the global tracing subscriber.
///
/// Output is `YYYY-MM-DD HH:MM:SS LEVEL target: message key=value ...`, teed to stdout and
/// `log_file_path` (parent directories are created). No ANSI codes so the file stays plain text.
/// Level comes from `RUST_LOG`; default `info`. Load `.env` before calling.
pub fn init_tracing(log_file_path: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(log_file_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    let file = Arc::new(file);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    use tracing_subscriber::fmt::writer::MakeWriterExt;
    let writer = io::stdout.and(file);

    let event_format = tracing_subscriber::fmt::format()
        .with_timer(ChronoLocal)
        .with_level(true)
        .with_target(true)
        .with_thread_ids(false);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .event_format(event_format)
        .with_span_events(FmtSpan::NONE)
        .with_ansi(false);

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(())
}

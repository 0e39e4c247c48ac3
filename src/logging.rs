//! File-based logging module for tunes-rs
//!
//! The TUI owns the terminal, so tracing output goes to a rolling file
//! instead of stdout.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const LOG_FILE_PREFIX: &str = "tunes-rs";
const DEFAULT_FILTER: &str = "tunes_rs=debug,reqwest=info,symphonia=warn,warn";

/// Initialize the logging system.
///
/// Logs are written to `<log_dir>/tunes-rs.YYYY-MM-DD.log` with daily rotation.
/// The log level can be controlled via the `RUST_LOG` environment variable.
///
/// Default log levels:
/// - `tunes_rs` modules: DEBUG
/// - `reqwest`: INFO
/// - Other crates: WARN
pub fn init_logging(log_dir: &Path) -> anyhow::Result<()> {
    // Ensure log directory exists
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)?;
    }

    // Daily rotating file appender
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);

    // Non-blocking so a slow disk never stalls the render loop
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keep the guard alive for the lifetime of the application.
    // It flushes on drop, so it is leaked rather than stored.
    Box::leak(Box::new(guard));

    // RUST_LOG wins over the built-in defaults
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    // File output only; stdout belongs to the TUI
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(log_dir = %log_dir.display(), "Logging initialized");

    Ok(())
}

/// Log the outcome of a playback transition
#[macro_export]
macro_rules! log_transition {
    ($name:expr, $changed:expr) => {
        if $changed {
            tracing::debug!(transition = $name, "Transition applied");
        } else {
            tracing::trace!(transition = $name, "Transition was a no-op");
        }
    };
}

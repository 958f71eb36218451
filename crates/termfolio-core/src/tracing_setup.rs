use std::fs::OpenOptions;
use std::io;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_FILE_ENV: &str = "TERMFOLIO_LOG_FILE";

/// Install the global subscriber.
///
/// Stdout belongs to the raw-mode terminal, so logs only go to the file named
/// by `TERMFOLIO_LOG_FILE`. Without it nothing is installed. `RUST_LOG`
/// overrides the default DEBUG filter. Returns the log path when enabled.
pub fn init_tracing() -> io::Result<Option<String>> {
    let Some(log_path) = std::env::var(LOG_FILE_ENV).ok().filter(|p| !p.is_empty()) else {
        return Ok(None);
    };

    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_filter(filter);

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(file_layer).try_init();
    Ok(Some(log_path))
}

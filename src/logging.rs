//! src/logging.rs
//!
//! Tracing setup.
//!
//! The terminal belongs to the UI, so logs only go to a daily rolling file
//! under the user's data directory (`~/.local/share/splitdeck/logs` on
//! Linux). Filtering follows `RUST_LOG`, defaulting to `info`:
//!
//! - `RUST_LOG=splitdeck::layout=debug` - register/unregister and drag sessions
//! - `RUST_LOG=splitdeck::layout=trace` - every resize step

use std::fs;
use std::path::PathBuf;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. Returns the log directory, or `None` if no
/// writable directory was found (logging is then disabled).
pub fn init() -> Option<PathBuf> {
    let logs_dir = dirs::data_local_dir()?.join("splitdeck").join("logs");
    if let Err(e) = fs::create_dir_all(&logs_dir) {
        eprintln!("Warning: Could not create log directory {}: {}", logs_dir.display(), e);
        return None;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_appender = tracing_appender::rolling::daily(&logs_dir, "splitdeck.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
    Some(logs_dir)
}

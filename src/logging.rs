//! Subscriber setup for hosts that do not install their own.

use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Installs a compact subscriber logging at `INFO` and above.
pub fn init() {
    init_with_level(Level::INFO);
}

/// Installs a compact subscriber logging at `level` and above.
///
/// Does nothing if a global subscriber is already set.
pub fn init_with_level(level: Level) {
    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(level);
    let _ = tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .try_init();
}

//! Log output setup

use tracing::Level;

/// Install the stderr log subscriber.
///
/// Stdout carries only the timing report, so all log output goes to stderr.
/// Calling this more than once is harmless; later calls are ignored.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::INFO)
        .with_target(false)
        .try_init();
}

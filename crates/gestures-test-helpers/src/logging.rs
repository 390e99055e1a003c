//! Test tracing subscriber.

use std::sync::Once;

use tracing::Level;

static INIT: Once = Once::new();

/// Install a `tracing` subscriber that writes through the test harness,
/// so log lines show up next to the failing test. Safe to call from every
/// test; only the first call installs.
pub fn init_test_tracing() {
    init_test_tracing_at(Level::DEBUG);
}

/// Like [`init_test_tracing`] with an explicit maximum level.
pub fn init_test_tracing_at(level: Level) {
    INIT.call_once(|| {
        // Another subscriber may already own the global slot.
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(level)
            .with_target(false)
            .try_init();
    });
}

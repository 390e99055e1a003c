//! Fuzzes the activity log decoder.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_parse_activity_log
#![no_main]
use gestures_activity::ActivityReplay;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Malformed logs must come back as errors, never panics.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(log) = ActivityReplay::default().parse(text) {
        // Anything accepted must encode again.
        let _ = log.encode();
    }
});

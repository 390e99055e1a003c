//! Fuzzes custom curve parsing and evaluation.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_custom_curve
#![no_main]
use gestures_curves::AccelCurve;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let values: Vec<f64> = data
        .chunks_exact(8)
        .map(|chunk| {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            f64::from_le_bytes(bytes)
        })
        .collect();
    // First half (rounded to whole segments) is the table, the rest are speeds.
    let (flat, speeds) = values.split_at(values.len() / 8 * 4);
    if let Ok(curve) = AccelCurve::from_flat(flat) {
        for &speed in speeds {
            let _ = curve.ratio(speed);
        }
    }
});

//! Microphone amplitude analysis

use crate::consts::{LEVEL_METER_MAX_WIDTH, LEVEL_METER_SCALE, SIGNAL_MIDPOINT};

/// Root-mean-square deviation of byte samples from the silence midpoint.
///
/// An empty buffer is silent.
pub fn rms_volume(samples: &[u8]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples
        .iter()
        .map(|&s| {
            let v = s as f32 - SIGNAL_MIDPOINT;
            v * v
        })
        .sum();
    (sum / samples.len() as f32).sqrt()
}

/// Loud enough to jump. Strictly greater than the threshold.
#[inline]
pub fn above_threshold(volume: f32, threshold: f32) -> bool {
    volume > threshold
}

/// Width in pixels of the on-page level meter
pub fn level_meter_width(volume: f32) -> f32 {
    (volume * LEVEL_METER_SCALE).min(LEVEL_METER_MAX_WIDTH)
}

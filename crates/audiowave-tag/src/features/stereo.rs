//! Stereo width estimation
//!
//! Width is derived from the Pearson correlation of the left and right
//! channels of the native (non-resampled) samples: perfectly correlated
//! channels give width 0, decorrelated channels approach 2. Downstream
//! consumers clamp to 1.0 where a bounded score is required.

/// Estimate stereo width from interleaved native samples
///
/// Returns 0.0 for mono input or when either channel is (near) constant.
pub fn stereo_width(samples: &[f32], channels: u16) -> f32 {
    if channels < 2 || samples.len() < 2 * channels as usize {
        return 0.0;
    }

    let ch = channels as usize;
    let frames = samples.len() / ch;

    let mut mean_l = 0.0f64;
    let mut mean_r = 0.0f64;
    for i in 0..frames {
        mean_l += samples[i * ch] as f64;
        mean_r += samples[i * ch + 1] as f64;
    }
    mean_l /= frames as f64;
    mean_r /= frames as f64;

    let mut var_l = 0.0f64;
    let mut var_r = 0.0f64;
    let mut cov = 0.0f64;
    for i in 0..frames {
        let dl = samples[i * ch] as f64 - mean_l;
        let dr = samples[i * ch + 1] as f64 - mean_r;
        var_l += dl * dl;
        var_r += dr * dr;
        cov += dl * dr;
    }

    // A flat channel has no meaningful correlation
    const VAR_FLOOR: f64 = 1e-12;
    if var_l < VAR_FLOOR || var_r < VAR_FLOOR {
        return 0.0;
    }

    let corr = cov / (var_l * var_r).sqrt();
    let width = 1.0 - corr.clamp(-1.0, 1.0);

    // Identical channels must report exactly zero; rounding in the
    // correlation can leave a residue on the order of 1e-16
    if width < 1e-6 {
        0.0
    } else {
        width as f32
    }
}

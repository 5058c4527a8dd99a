//! Static color fills

use crate::buffer::{BufferError, LedBuffer};
use crate::color::{Rgb, lerp_colors};

/// Fill the whole buffer with one color
pub fn solid<const MAX_LEDS: usize>(leds: &mut LedBuffer<MAX_LEDS>, color: Rgb) {
    leds.fill(color);
}

/// Paint a triangle gradient over the first `num_leds` pixels
///
/// Blends from `from` to `to` across the first half, then back toward `from`
/// across the second half.
pub fn gradient<const MAX_LEDS: usize>(
    leds: &mut LedBuffer<MAX_LEDS>,
    num_leds: usize,
    from: Rgb,
    to: Rgb,
) -> Result<(), BufferError> {
    for index in 0..num_leds {
        let ratio = triangle_ratio(index, num_leds);
        leds.set(index, lerp_colors(from, to, ratio))?;
    }
    Ok(())
}

/// Position on a rise-then-fall ramp: `i/(n/2)` up to the center, then
/// `1-(i-n/2)/(n/2)`
#[allow(clippy::cast_precision_loss)]
pub(super) fn triangle_ratio(index: usize, len: usize) -> f32 {
    let half = len as f32 / 2.0;
    let position = index as f32;
    if position < half {
        position / half
    } else {
        1.0 - (position - half) / half
    }
}

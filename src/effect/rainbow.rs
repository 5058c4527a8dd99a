//! Rainbow fills
//!
//! Two variants share the full saturation/value HSV sweep:
//! - [`rainbow`]: hue grows linearly across the strip
//! - [`rainbow_mirrored`]: hue rises across the first half and falls back
//!   across the second

use super::static_color::triangle_ratio;
use crate::buffer::{BufferError, LedBuffer};
use crate::color::hsv_to_rgb;

/// Sweep the hue across the first `num_leds` pixels, `hue = (i+1)/n`
#[allow(clippy::cast_precision_loss)]
pub fn rainbow<const MAX_LEDS: usize>(
    leds: &mut LedBuffer<MAX_LEDS>,
    num_leds: usize,
) -> Result<(), BufferError> {
    let len = num_leds as f32;
    for index in 0..num_leds {
        let hue = (index + 1) as f32 / len;
        leds.set(index, hsv_to_rgb(hue, 1.0, 1.0))?;
    }
    Ok(())
}

/// Symmetric rainbow
///
/// The first half uses `(i+1)/(n/2)` so the sweep starts one step in, like
/// [`rainbow`]; the second half falls back along the triangle ramp.
#[allow(clippy::cast_precision_loss)]
pub fn rainbow_mirrored<const MAX_LEDS: usize>(
    leds: &mut LedBuffer<MAX_LEDS>,
    num_leds: usize,
) -> Result<(), BufferError> {
    let half = num_leds as f32 / 2.0;
    for index in 0..num_leds {
        let hue = if (index as f32) < half {
            (index + 1) as f32 / half
        } else {
            triangle_ratio(index, num_leds)
        };
        leds.set(index, hsv_to_rgb(hue, 1.0, 1.0))?;
    }
    Ok(())
}

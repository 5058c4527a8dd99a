//! Mutators that change the logical length of the strip
//!
//! Each mutator rebuilds the pixels into a fresh fixed-capacity vector and
//! reinitializes the buffer from it. Mutators are not idempotent, so they
//! always start from the canonical `num_leds` pixels (see [`mutator_reset`]).

use heapless::Vec;

use crate::buffer::{BufferError, LedBuffer};
use crate::color::Rgb;
use crate::pedal::PedalLayout;

/// Collapse the buffer back to exactly `num_leds` pixels
pub fn mutator_reset<const MAX_LEDS: usize>(
    leds: &mut LedBuffer<MAX_LEDS>,
    num_leds: usize,
) -> Result<(), BufferError> {
    let mut pixels: Vec<Rgb, MAX_LEDS> = Vec::new();
    for index in 0..num_leds {
        push(&mut pixels, leds.get(index)?)?;
    }
    leds.reinit_from(&pixels)
}

/// Repeat every pixel `pedal_length` times
///
/// The result is `num_leds * pedal_length` pixels long.
pub fn extend<const MAX_LEDS: usize>(
    leds: &mut LedBuffer<MAX_LEDS>,
    layout: PedalLayout,
) -> Result<(), BufferError> {
    if layout.pedal_length == 0 {
        return Err(BufferError::ZeroPedalLength);
    }
    let target = layout.extended_len();
    if target > MAX_LEDS {
        return Err(BufferError::CapacityExceeded {
            requested: target,
            capacity: MAX_LEDS,
        });
    }

    let mut pixels: Vec<Rgb, MAX_LEDS> = Vec::new();
    for index in 0..target {
        push(&mut pixels, leds.get(index / layout.pedal_length)?)?;
    }
    leds.reinit_from(&pixels)
}

/// Fold the strip into a palindrome
///
/// Takes the even-indexed pixels of the first `num_leds` and appends the same
/// sequence reversed.
pub fn mirror<const MAX_LEDS: usize>(
    leds: &mut LedBuffer<MAX_LEDS>,
    layout: PedalLayout,
) -> Result<(), BufferError> {
    let mut pixels: Vec<Rgb, MAX_LEDS> = Vec::new();
    for index in (0..layout.num_leds).step_by(2) {
        push(&mut pixels, leds.get(index)?)?;
    }

    let half = pixels.len();
    for index in (0..half).rev() {
        let pixel = pixels[index];
        push(&mut pixels, pixel)?;
    }
    leds.reinit_from(&pixels)
}

fn push<const MAX_LEDS: usize>(
    pixels: &mut Vec<Rgb, MAX_LEDS>,
    pixel: Rgb,
) -> Result<(), BufferError> {
    pixels.push(pixel).map_err(|_| BufferError::CapacityExceeded {
        requested: MAX_LEDS.saturating_add(1),
        capacity: MAX_LEDS,
    })
}

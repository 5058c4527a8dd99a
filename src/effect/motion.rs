//! Per-tick motion transforms

use crate::buffer::{BufferError, LedBuffer};

/// Brightness change per breathe tick
pub const BREATHE_STEP: f32 = 0.01;

/// Lowest brightness reached while breathing
pub const BREATHE_FLOOR: f32 = 0.1;

/// Rotate every pixel one position toward index 0
///
/// The pixel that falls off the front is placed in the last slot.
pub fn swirl<const MAX_LEDS: usize>(leds: &mut LedBuffer<MAX_LEDS>) -> Result<(), BufferError> {
    let len = leds.len();
    leds.rotate_left(0..len)
}

/// Rotate the two halves of the strip in opposite directions
///
/// The first half moves toward index 0, the second half toward the end, so
/// a mirrored pattern flows symmetrically around the center.
pub fn radiate<const MAX_LEDS: usize>(leds: &mut LedBuffer<MAX_LEDS>) -> Result<(), BufferError> {
    let len = leds.len();
    let half = len / 2;
    leds.rotate_left(0..half)?;
    leds.rotate_right(half..len)
}

/// Oscillator state shared by the brightness animations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    flash_counter: u32,
    breathe_increasing: bool,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new()
    }
}

impl Oscillator {
    pub const fn new() -> Self {
        Self {
            flash_counter: 0,
            breathe_increasing: true,
        }
    }

    pub const fn flash_counter(&self) -> u32 {
        self.flash_counter
    }

    pub const fn is_breathing_in(&self) -> bool {
        self.breathe_increasing
    }

    /// Move the transient brightness one step between the floor and the
    /// setpoint, reversing at either bound
    ///
    /// Steps stop at the bound instead of overshooting it. A setpoint below
    /// [`BREATHE_FLOOR`] also lowers the floor, so breathing never lights the
    /// strip brighter than the user asked for.
    pub fn breathe<const MAX_LEDS: usize>(
        &mut self,
        leds: &mut LedBuffer<MAX_LEDS>,
        setpoint: f32,
    ) {
        let floor = BREATHE_FLOOR.min(setpoint);
        if self.breathe_increasing {
            leds.set_brightness((leds.brightness() + BREATHE_STEP).min(setpoint));
            if leds.brightness() >= setpoint {
                self.breathe_increasing = false;
            }
        } else {
            leds.set_brightness((leds.brightness() - BREATHE_STEP).max(floor));
            if leds.brightness() <= floor {
                self.breathe_increasing = true;
            }
        }
    }

    /// Toggle the transient brightness between the setpoint and off
    pub fn flash<const MAX_LEDS: usize>(&mut self, leds: &mut LedBuffer<MAX_LEDS>, setpoint: f32) {
        if self.flash_counter.is_multiple_of(2) {
            leds.set_brightness(setpoint);
        } else {
            leds.set_brightness(0.0);
        }
        self.flash_counter = self.flash_counter.wrapping_add(1);
    }
}

use core::ops::Range;

/// Arrangement of the strip into pedals
///
/// A pedal is a contiguous run of `pedal_length` LEDs. The last pedal may be
/// shorter when `num_leds` is not a multiple of `pedal_length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PedalLayout {
    pub num_leds: usize,
    pub pedal_length: usize,
}

impl PedalLayout {
    pub const fn new(num_leds: usize, pedal_length: usize) -> Self {
        Self {
            num_leds,
            pedal_length,
        }
    }

    /// Number of pedals, counting a trailing partial pedal
    pub const fn pedal_count(self) -> usize {
        if self.pedal_length == 0 {
            return 0;
        }
        self.num_leds.div_ceil(self.pedal_length)
    }

    /// LED index range covered by a pedal
    ///
    /// Returns an empty range for pedals past the end of the strip.
    pub fn pedal_range(self, pedal: usize) -> Range<usize> {
        let start = pedal.saturating_mul(self.pedal_length).min(self.num_leds);
        let end = pedal
            .saturating_add(1)
            .saturating_mul(self.pedal_length)
            .min(self.num_leds);
        start..end
    }

    /// Buffer length after every pixel is stretched across a pedal
    pub const fn extended_len(self) -> usize {
        self.num_leds.saturating_mul(self.pedal_length)
    }
}

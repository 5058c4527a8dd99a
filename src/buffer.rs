//! Brightness-scaled LED buffer
//!
//! Keeps two views of the strip: the logical colors written by effects and
//! the hardware frame that is handed to the [`OutputDriver`]. The hardware
//! frame is always `logical * brightness`, truncated and clamped per channel.

use core::fmt;
use core::ops::Range;

use heapless::Vec;

use crate::OutputDriver;
use crate::color::Rgb;

/// Errors raised by [`LedBuffer`] operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// Index outside `0..len`
    IndexOutOfBounds { index: usize, len: usize },
    /// Requested length does not fit into the fixed capacity
    CapacityExceeded { requested: usize, capacity: usize },
    /// Pedals must hold at least one LED
    ZeroPedalLength,
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::IndexOutOfBounds { index, len } => {
                write!(f, "LED index {} out of bounds (len {})", index, len)
            }
            BufferError::CapacityExceeded {
                requested,
                capacity,
            } => write!(
                f,
                "{} LEDs requested but buffer holds at most {}",
                requested, capacity
            ),
            BufferError::ZeroPedalLength => write!(f, "pedal length must be at least 1"),
        }
    }
}

impl core::error::Error for BufferError {}

/// Fixed-capacity pixel buffer with a global brightness scale
#[derive(Debug, Clone)]
pub struct LedBuffer<const MAX_LEDS: usize> {
    logical: Vec<Rgb, MAX_LEDS>,
    frame: Vec<Rgb, MAX_LEDS>,
    brightness: f32,
}

impl<const MAX_LEDS: usize> LedBuffer<MAX_LEDS> {
    /// Create a buffer of `len` black pixels
    pub fn new(len: usize, brightness: f32) -> Result<Self, BufferError> {
        let mut buffer = Self {
            logical: Vec::new(),
            frame: Vec::new(),
            brightness: brightness.clamp(0.0, 1.0),
        };
        buffer.init(len)?;
        Ok(buffer)
    }

    /// Reallocate to `len` black pixels, keeping the brightness
    pub fn init(&mut self, len: usize) -> Result<(), BufferError> {
        Self::check_capacity(len)?;
        self.logical.clear();
        self.frame.clear();
        for _ in 0..len {
            // Capacity was checked above.
            let _ = self.logical.push(Rgb::default());
            let _ = self.frame.push(Rgb::default());
        }
        Ok(())
    }

    /// Replace the contents with `pixels`, keeping the brightness
    pub fn reinit_from(&mut self, pixels: &[Rgb]) -> Result<(), BufferError> {
        Self::check_capacity(pixels.len())?;
        self.logical.clear();
        self.frame.clear();
        for &pixel in pixels {
            let _ = self.logical.push(pixel);
            let _ = self.frame.push(scale(pixel, self.brightness));
        }
        Ok(())
    }

    fn check_capacity(len: usize) -> Result<(), BufferError> {
        if len > MAX_LEDS {
            return Err(BufferError::CapacityExceeded {
                requested: len,
                capacity: MAX_LEDS,
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.logical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logical.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        MAX_LEDS
    }

    /// Logical (unscaled) color at `index`
    pub fn get(&self, index: usize) -> Result<Rgb, BufferError> {
        self.logical
            .get(index)
            .copied()
            .ok_or(BufferError::IndexOutOfBounds {
                index,
                len: self.len(),
            })
    }

    /// Write a logical color at `index`
    pub fn set(&mut self, index: usize, color: Rgb) -> Result<(), BufferError> {
        let len = self.len();
        let (Some(logical), Some(stored)) =
            (self.logical.get_mut(index), self.frame.get_mut(index))
        else {
            return Err(BufferError::IndexOutOfBounds { index, len });
        };
        *logical = color;
        *stored = scale(color, self.brightness);
        Ok(())
    }

    /// Set every pixel to the same logical color
    pub fn fill(&mut self, color: Rgb) {
        let stored = scale(color, self.brightness);
        self.logical.iter_mut().for_each(|led| *led = color);
        self.frame.iter_mut().for_each(|led| *led = stored);
    }

    pub const fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Change the global scale and rescale every stored pixel
    ///
    /// The value is clamped to 0.0-1.0.
    pub fn set_brightness(&mut self, brightness: f32) {
        let brightness = if brightness.is_nan() {
            0.0
        } else {
            brightness.clamp(0.0, 1.0)
        };
        self.brightness = brightness;
        for (stored, logical) in self.frame.iter_mut().zip(self.logical.iter()) {
            *stored = scale(*logical, brightness);
        }
    }

    /// Rotate the pixels in `range` one position toward its start
    pub fn rotate_left(&mut self, range: Range<usize>) -> Result<(), BufferError> {
        self.check_range(&range)?;
        if range.len() > 1 {
            self.logical[range.clone()].rotate_left(1);
            self.frame[range].rotate_left(1);
        }
        Ok(())
    }

    /// Rotate the pixels in `range` one position toward its end
    pub fn rotate_right(&mut self, range: Range<usize>) -> Result<(), BufferError> {
        self.check_range(&range)?;
        if range.len() > 1 {
            self.logical[range.clone()].rotate_right(1);
            self.frame[range].rotate_right(1);
        }
        Ok(())
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), BufferError> {
        if range.start > range.end || range.end > self.len() {
            return Err(BufferError::IndexOutOfBounds {
                index: range.end,
                len: self.len(),
            });
        }
        Ok(())
    }

    /// Logical colors of every pixel
    pub fn pixels(&self) -> &[Rgb] {
        &self.logical
    }

    /// Brightness-scaled colors as they are sent to the hardware
    pub fn frame(&self) -> &[Rgb] {
        &self.frame
    }

    /// Hand the hardware frame to the output driver
    pub fn flush<O: OutputDriver>(&self, output: &mut O) {
        output.write(&self.frame);
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale(color: Rgb, brightness: f32) -> Rgb {
    let channel = |value: u8| (f32::from(value) * brightness).clamp(0.0, 255.0) as u8;
    Rgb {
        r: channel(color.r),
        g: channel(color.g),
        b: channel(color.b),
    }
}

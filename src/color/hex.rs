use core::fmt;

use super::Rgb;

/// Error returned when a color token cannot be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorError {
    /// Token is not a `#RRGGBB` hex color
    InvalidHex,
    /// Token is not a known color effect
    UnknownColor,
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::InvalidHex => write!(f, "invalid hex color"),
            ColorError::UnknownColor => write!(f, "unknown color state"),
        }
    }
}

impl core::error::Error for ColorError {}

/// Parse a `#RRGGBB` (or bare `RRGGBB`) hex color
///
/// Surrounding whitespace is ignored.
pub fn parse_hex_color(value: &str) -> Result<Rgb, ColorError> {
    let value = value.trim();
    let digits = value.strip_prefix('#').unwrap_or(value);
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(ColorError::InvalidHex);
    }

    let channel = |range: core::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .ok_or(ColorError::InvalidHex)
    };

    Ok(Rgb {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

mod hex;
mod hsv;

pub use hex::{ColorError, parse_hex_color};
pub use hsv::hsv_to_rgb;
use smart_leds::RGB8;

pub type Rgb = RGB8;

/// Linear interpolation between two colors
///
/// `ratio` of 0.0 yields `from`, 1.0 yields `to`. Channels are truncated
/// toward zero, matching the hardware-facing integer conversion used
/// everywhere else in the engine.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn lerp_colors(from: Rgb, to: Rgb, ratio: f32) -> Rgb {
    let channel = |a: u8, b: u8| {
        let a = f32::from(a);
        (a + ratio * (f32::from(b) - a)) as u8
    };
    Rgb {
        r: channel(from.r, to.r),
        g: channel(from.g, to.g),
        b: channel(from.b, to.b),
    }
}

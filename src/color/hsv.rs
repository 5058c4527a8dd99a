use libm::floorf;

use super::Rgb;

/// Convert a floating point HSV color to RGB
///
/// `hue`, `sat` and `val` are in the 0.0-1.0 range; hue wraps around so values
/// at or above 1.0 land back in the red sector. Output channels are scaled to
/// 0-255 by truncation.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]
pub fn hsv_to_rgb(hue: f32, sat: f32, val: f32) -> Rgb {
    let to_u8 = |v: f32| (v * 255.0) as u8;

    if sat == 0.0 {
        let v = to_u8(val);
        return Rgb { r: v, g: v, b: v };
    }

    let scaled = hue * 6.0;
    let sector = floorf(scaled);
    let f = scaled - sector;
    let p = val * (1.0 - sat);
    let q = val * (1.0 - sat * f);
    let t = val * (1.0 - sat * (1.0 - f));

    let (r, g, b) = match (sector as i32).rem_euclid(6) {
        0 => (val, t, p),
        1 => (q, val, p),
        2 => (p, val, t),
        3 => (p, q, val),
        4 => (t, p, val),
        _ => (val, p, q),
    };

    Rgb {
        r: to_u8(r),
        g: to_u8(g),
        b: to_u8(b),
    }
}

//! Effect system with compile-time known effect variants
//!
//! Three closed families of effects act on the [`LedBuffer`]:
//! - [`ColorEffect`]: static paints selected by the `color` command
//! - [`MotionEffect`]: per-tick transforms selected by the `motion` command,
//!   some of them paired with a [`Mutator`]
//! - [`Mutator`]: reshapes the buffer length whenever the color or the motion
//!   list is (re-)set
//!
//! Names only exist at the JSON boundary; everything past parsing is an
//! exhaustive match.

mod motion;
mod mutator;
mod rainbow;
mod static_color;

use alloc::string::String;
use core::fmt;

use heapless::Vec;
pub use motion::{BREATHE_FLOOR, BREATHE_STEP, Oscillator, radiate, swirl};
pub use mutator::{extend, mirror, mutator_reset};
pub use rainbow::{rainbow, rainbow_mirrored};
pub use static_color::{gradient, solid};

use crate::buffer::{BufferError, LedBuffer};
use crate::color::{ColorError, Rgb, parse_hex_color};
use crate::pedal::PedalLayout;

const EFFECT_NAME_SWIRL: &str = "swirl";
const EFFECT_NAME_EXTENDED_SWIRL: &str = "extended_swirl";
const EFFECT_NAME_BREATHE: &str = "breathe";
const EFFECT_NAME_FLASH: &str = "flash";
const EFFECT_NAME_RADIATE: &str = "radiate";

const COLOR_NAME_RAINBOW: &str = "rainbow";
const COLOR_NAME_RAINBOW2: &str = "rainbow2";
const GRADIENT_PREFIX: &str = "grad";
const GRADIENT_PREFIX_LONG: &str = "gradient";

/// Number of distinct motion effects
pub const MOTION_EFFECT_COUNT: usize = 5;

/// Ordered set of active motion effects
pub type MotionList = Vec<MotionEffect, MOTION_EFFECT_COUNT>;

/// Error returned when an effect name is not known
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectError {
    UnknownMotion(String),
}

impl fmt::Display for EffectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectError::UnknownMotion(name) => write!(f, "motion state does not exist: {}", name),
        }
    }
}

impl core::error::Error for EffectError {}

/// Known motion effects that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionEffect {
    Swirl,
    ExtendedSwirl,
    Breathe,
    Flash,
    Radiate,
}

/// Per-tick part of a motion effect
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transform {
    Swirl,
    Radiate,
    Breathe,
    Flash,
}

/// Topology-changing part of a motion effect
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutator {
    Extend,
    Mirror,
}

impl MotionEffect {
    pub const ALL: [MotionEffect; MOTION_EFFECT_COUNT] = [
        Self::Swirl,
        Self::ExtendedSwirl,
        Self::Breathe,
        Self::Flash,
        Self::Radiate,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Swirl => EFFECT_NAME_SWIRL,
            Self::ExtendedSwirl => EFFECT_NAME_EXTENDED_SWIRL,
            Self::Breathe => EFFECT_NAME_BREATHE,
            Self::Flash => EFFECT_NAME_FLASH,
            Self::Radiate => EFFECT_NAME_RADIATE,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            EFFECT_NAME_SWIRL => Some(Self::Swirl),
            EFFECT_NAME_EXTENDED_SWIRL => Some(Self::ExtendedSwirl),
            EFFECT_NAME_BREATHE => Some(Self::Breathe),
            EFFECT_NAME_FLASH => Some(Self::Flash),
            EFFECT_NAME_RADIATE => Some(Self::Radiate),
            _ => None,
        }
    }

    pub const fn transform(self) -> Transform {
        match self {
            Self::Swirl | Self::ExtendedSwirl => Transform::Swirl,
            Self::Breathe => Transform::Breathe,
            Self::Flash => Transform::Flash,
            Self::Radiate => Transform::Radiate,
        }
    }

    pub const fn mutator(self) -> Option<Mutator> {
        match self {
            Self::ExtendedSwirl => Some(Mutator::Extend),
            Self::Radiate => Some(Mutator::Mirror),
            Self::Swirl | Self::Breathe | Self::Flash => None,
        }
    }
}

/// Validate a list of motion names
///
/// Fails on the first unknown name; nothing is returned in that case so the
/// caller can keep its previous list. Duplicates are dropped, keeping the
/// first occurrence.
pub fn parse_motion_list<S: AsRef<str>>(names: &[S]) -> Result<MotionList, EffectError> {
    let mut list = MotionList::new();
    for name in names {
        let name = name.as_ref();
        let effect = MotionEffect::parse_from_str(name)
            .ok_or_else(|| EffectError::UnknownMotion(name.into()))?;
        if !list.contains(&effect) {
            // At most one entry per variant, so the list never overflows.
            let _ = list.push(effect);
        }
    }
    Ok(list)
}

impl Transform {
    /// Run one animation step
    pub fn apply<const MAX_LEDS: usize>(
        self,
        leds: &mut LedBuffer<MAX_LEDS>,
        oscillator: &mut Oscillator,
        brightness_setpoint: f32,
    ) -> Result<(), BufferError> {
        match self {
            Self::Swirl => swirl(leds),
            Self::Radiate => radiate(leds),
            Self::Breathe => {
                oscillator.breathe(leds, brightness_setpoint);
                Ok(())
            }
            Self::Flash => {
                oscillator.flash(leds, brightness_setpoint);
                Ok(())
            }
        }
    }
}

impl Mutator {
    pub fn apply<const MAX_LEDS: usize>(
        self,
        leds: &mut LedBuffer<MAX_LEDS>,
        layout: PedalLayout,
    ) -> Result<(), BufferError> {
        match self {
            Self::Extend => extend(leds, layout),
            Self::Mirror => mirror(leds, layout),
        }
    }
}

/// Static color state selected by the `color` command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorEffect {
    /// Single color fill
    Solid(Rgb),
    /// Triangle gradient from the first color to the second and back
    Gradient(Rgb, Rgb),
    /// Hue sweep across the whole strip
    Rainbow,
    /// Hue sweep up across the first half and back down across the second
    Rainbow2,
}

impl ColorEffect {
    /// Parse a color token
    ///
    /// Accepts `#RRGGBB`, `grad,#RRGGBB,#RRGGBB` (or the `gradient` prefix),
    /// `rainbow` and `rainbow2`.
    pub fn parse_from_str(s: &str) -> Result<Self, ColorError> {
        let s = s.trim();
        if s.contains(',') {
            let mut parts = s.split(',');
            let prefix = parts.next().map(str::trim);
            let (Some(from), Some(to), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(ColorError::UnknownColor);
            };
            if !matches!(prefix, Some(GRADIENT_PREFIX | GRADIENT_PREFIX_LONG)) {
                return Err(ColorError::UnknownColor);
            }
            return Ok(Self::Gradient(parse_hex_color(from)?, parse_hex_color(to)?));
        }

        match s {
            COLOR_NAME_RAINBOW => Ok(Self::Rainbow),
            COLOR_NAME_RAINBOW2 => Ok(Self::Rainbow2),
            _ if s.starts_with('#') => parse_hex_color(s).map(Self::Solid),
            _ => Err(ColorError::UnknownColor),
        }
    }

    /// Paint the first `num_leds` pixels
    pub fn paint<const MAX_LEDS: usize>(
        self,
        leds: &mut LedBuffer<MAX_LEDS>,
        num_leds: usize,
    ) -> Result<(), BufferError> {
        match self {
            Self::Solid(color) => {
                solid(leds, color);
                Ok(())
            }
            Self::Gradient(from, to) => gradient(leds, num_leds, from, to),
            Self::Rainbow => rainbow(leds, num_leds),
            Self::Rainbow2 => rainbow_mirrored(leds, num_leds),
        }
    }
}

impl fmt::Display for ColorEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = |f: &mut fmt::Formatter<'_>, c: Rgb| {
            write!(f, "#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
        };
        match self {
            Self::Solid(color) => hex(f, *color),
            Self::Gradient(from, to) => {
                write!(f, "{},", GRADIENT_PREFIX)?;
                hex(f, *from)?;
                write!(f, ",")?;
                hex(f, *to)
            }
            Self::Rainbow => f.write_str(COLOR_NAME_RAINBOW),
            Self::Rainbow2 => f.write_str(COLOR_NAME_RAINBOW2),
        }
    }
}

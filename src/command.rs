//! Command decoding and validation
//!
//! A command is a flat JSON object. Every key has a short form (used on the
//! wire and in persisted snapshots) and a long alias:
//!
//! | key          | value                                             |
//! |--------------|---------------------------------------------------|
//! | `co`/`color` | `#RRGGBB`, `grad,#RRGGBB,#RRGGBB`, `rainbow`, `rainbow2` |
//! | `mo`/`motion`| list of motion effect names                       |
//! | `ur`/`rate`  | seconds between renders                           |
//! | `sp`/`speed` | renders per second, `0` renders every tick        |
//! | `br`/`brightness` | brightness in percent                        |
//!
//! Numbers may also be given as numeric strings, which is how snapshots store
//! them. Unknown keys are ignored.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use embassy_time::Duration;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::buffer::BufferError;
use crate::color::ColorError;
use crate::effect::{ColorEffect, EffectError, parse_motion_list};
use crate::operation::OperationList;

/// Errors raised while decoding or applying a command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// Payload is not a JSON object with well-typed fields
    Malformed,
    /// Numeric field is negative, not finite or not a number at all
    InvalidValue(&'static str),
    /// Color token could not be interpreted
    Color(ColorError),
    /// Motion list names an unknown effect
    Motion(EffectError),
    /// A mutator did not fit into the LED buffer
    Buffer(BufferError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Malformed => write!(f, "malformed command"),
            CommandError::InvalidValue(field) => write!(f, "invalid value for `{}`", field),
            CommandError::Color(e) => write!(f, "color rejected: {}", e),
            CommandError::Motion(e) => write!(f, "motion rejected: {}", e),
            CommandError::Buffer(e) => write!(f, "buffer error: {}", e),
        }
    }
}

impl core::error::Error for CommandError {}

impl From<ColorError> for CommandError {
    fn from(e: ColorError) -> Self {
        CommandError::Color(e)
    }
}

impl From<EffectError> for CommandError {
    fn from(e: EffectError) -> Self {
        CommandError::Motion(e)
    }
}

impl From<BufferError> for CommandError {
    fn from(e: BufferError) -> Self {
        CommandError::Buffer(e)
    }
}

/// Decoded command object
///
/// Every field is optional: absent keys leave the matching engine state
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Command {
    #[serde(default, rename = "co", alias = "color")]
    pub color: Option<String>,
    #[serde(default, rename = "mo", alias = "motion")]
    pub motion: Option<Vec<String>>,
    #[serde(
        default,
        rename = "ur",
        alias = "rate",
        deserialize_with = "number"
    )]
    pub rate: Option<f32>,
    #[serde(
        default,
        rename = "sp",
        alias = "speed",
        deserialize_with = "number"
    )]
    pub speed: Option<f32>,
    #[serde(
        default,
        rename = "br",
        alias = "brightness",
        deserialize_with = "number"
    )]
    pub brightness: Option<f32>,
}

/// Accept a JSON number or a string holding one
///
/// Anything else decodes to NaN, which [`Command::plan`] rejects for that
/// field alone, the same way it rejects negative values.
#[allow(clippy::cast_possible_truncation)]
fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f32>, D::Error> {
    let number = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().map(|n| n as f32),
        Value::String(s) => s.trim().parse::<f32>().ok(),
        _ => None,
    };
    Ok(Some(number.unwrap_or(f32::NAN)))
}

/// Result of validating a command
///
/// Invalid fields are left out of `operations`; the first rejection is kept
/// in `error` so the caller can report it after applying the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandPlan {
    pub operations: OperationList,
    pub error: Option<CommandError>,
}

impl CommandPlan {
    fn reject(&mut self, error: CommandError) {
        log::error!("pollinate: {}", error);
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

impl Command {
    /// Decode a command from a JSON object string
    pub fn from_json(payload: &str) -> Result<Self, CommandError> {
        let value: Value = serde_json::from_str(payload).map_err(|e| {
            log::error!("failed to parse JSON: {}", e);
            CommandError::Malformed
        })?;
        let Value::Object(map) = value else {
            log::error!("command is not a JSON object");
            return Err(CommandError::Malformed);
        };
        Self::from_map(map)
    }

    /// Decode a command from an already parsed key-value object
    pub fn from_map(map: Map<String, Value>) -> Result<Self, CommandError> {
        serde_json::from_value(Value::Object(map)).map_err(|e| {
            log::error!("invalid command field: {}", e);
            CommandError::Malformed
        })
    }

    /// Validate every present field and order the resulting operations
    ///
    /// Order is color, motion, rate, speed, brightness, so that a later
    /// interval or brightness change is never clobbered by an earlier one.
    pub fn plan(&self) -> CommandPlan {
        let mut plan = CommandPlan::default();

        if let Some(color) = &self.color {
            match ColorEffect::parse_from_str(color) {
                Ok(effect) => {
                    let _ = plan.operations.push_color(effect);
                }
                Err(e) => plan.reject(e.into()),
            }
        }

        if let Some(motion) = &self.motion {
            match parse_motion_list(motion) {
                Ok(list) => {
                    let _ = plan.operations.push_motion(list);
                }
                Err(e) => plan.reject(e.into()),
            }
        }

        if let Some(rate) = self.rate {
            match interval_from_secs(rate) {
                Some(interval) => {
                    let _ = plan.operations.push_update_interval(interval);
                }
                None => plan.reject(CommandError::InvalidValue("rate")),
            }
        }

        if let Some(speed) = self.speed {
            let interval = if speed == 0.0 {
                Some(Duration::from_ticks(0))
            } else {
                interval_from_secs(1.0 / speed)
            };
            match interval {
                Some(interval) => {
                    let _ = plan.operations.push_update_interval(interval);
                }
                None => plan.reject(CommandError::InvalidValue("speed")),
            }
        }

        if let Some(percent) = self.brightness {
            if percent.is_finite() {
                let _ = plan
                    .operations
                    .push_brightness((percent / 100.0).clamp(0.0, 1.0));
            } else {
                plan.reject(CommandError::InvalidValue("brightness"));
            }
        }

        plan
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn interval_from_secs(secs: f32) -> Option<Duration> {
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    Some(Duration::from_micros((secs * 1_000_000.0) as u64))
}

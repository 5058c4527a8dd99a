use alloc::string::{String, ToString};
use alloc::vec::Vec;

use embassy_time::{Duration, Instant};
use serde_json::{Map, Value};

use crate::OutputDriver;
use crate::buffer::{BufferError, LedBuffer};
use crate::color::Rgb;
use crate::command::{Command, CommandError, CommandPlan};
use crate::config::FlowerConfig;
use crate::effect::{ColorEffect, MotionList, Oscillator, mutator_reset};
use crate::operation::Operation;
use crate::pedal::PedalLayout;

/// Snapshot keys
pub const KEY_NAME: &str = "n";
pub const KEY_ID: &str = "id";
pub const KEY_COLOR: &str = "co";
pub const KEY_MOTION: &str = "mo";
pub const KEY_SPEED: &str = "sp";
pub const KEY_BRIGHTNESS: &str = "br";

/// Whether any motion effect is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    /// Buffer only changes on commands
    Idle,
    /// Buffer is re-rendered every update interval
    Animating,
}

/// Effect configuration owned by the engine
#[derive(Debug, Clone)]
pub struct EffectState {
    pub color: Option<ColorEffect>,
    pub motions: MotionList,
    /// User brightness (0.0-1.0), distinct from the animated buffer brightness
    pub brightness_setpoint: f32,
    /// Time between renders, zero renders on every tick
    pub update_interval: Duration,
    pub oscillator: Oscillator,
}

#[derive(Debug, Clone, Copy)]
struct Identity {
    name: Option<&'static str>,
    id: Option<u32>,
}

/// Animation engine - owns the LED buffer and the effect state
pub struct AnimationEngine<O: OutputDriver, const MAX_LEDS: usize> {
    output: O,
    layout: PedalLayout,
    identity: Identity,
    default_update_interval: Duration,
    default_brightness: f32,

    state: EffectState,
    leds: LedBuffer<MAX_LEDS>,
    last_render: Instant,
}

impl<O: OutputDriver, const MAX_LEDS: usize> AnimationEngine<O, MAX_LEDS> {
    /// Create an engine with a black strip of `config.num_leds` pixels
    ///
    /// Fails when the strip does not fit into `MAX_LEDS` or when
    /// `config.pedal_length` is zero.
    pub fn new(config: &FlowerConfig, output: O, now: Instant) -> Result<Self, BufferError> {
        if config.pedal_length == 0 {
            return Err(BufferError::ZeroPedalLength);
        }
        let brightness = config.brightness.clamp(0.0, 1.0);
        Ok(Self {
            output,
            layout: PedalLayout::new(config.num_leds, config.pedal_length),
            identity: Identity {
                name: config.name,
                id: config.id,
            },
            default_update_interval: config.update_interval,
            default_brightness: brightness,
            state: EffectState {
                color: None,
                motions: MotionList::new(),
                brightness_setpoint: brightness,
                update_interval: config.update_interval,
                oscillator: Oscillator::new(),
            },
            leds: LedBuffer::new(config.num_leds, brightness)?,
            last_render: now,
        })
    }

    /// Apply a command to the engine ("pollinate")
    ///
    /// Valid fields are applied in command order even when another field is
    /// rejected; the first rejection is returned. The buffer is flushed
    /// afterwards so color and brightness changes show up immediately.
    pub fn pollinate(&mut self, command: &Command) -> Result<(), CommandError> {
        self.execute(command.plan())
    }

    /// Apply an already validated command plan, then flush
    pub fn execute(&mut self, plan: CommandPlan) -> Result<(), CommandError> {
        let mut error = plan.error;

        for operation in &plan.operations {
            if let Err(e) = self.apply(operation) {
                log::error!("pollinate: {}", e);
                error.get_or_insert(e.into());
            }
        }

        self.flush();
        match error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Apply a single validated operation
    pub fn apply(&mut self, operation: &Operation) -> Result<(), BufferError> {
        match operation {
            Operation::SetColor(effect) => {
                self.state.color = Some(*effect);
                effect.paint(&mut self.leds, self.layout.num_leds)?;
                self.invoke_mutators()
            }
            Operation::SetMotion(motions) => {
                self.state.motions.clone_from(motions);
                self.leds.set_brightness(self.state.brightness_setpoint);
                self.invoke_mutators()
            }
            Operation::SetUpdateInterval(interval) => {
                self.state.update_interval = *interval;
                Ok(())
            }
            Operation::SetBrightness(brightness) => {
                self.state.brightness_setpoint = *brightness;
                self.leds.set_brightness(*brightness);
                Ok(())
            }
        }
    }

    /// Re-apply the mutators of the active motion effects
    ///
    /// Always starts from exactly `num_leds` pixels so mutators compose the
    /// same way every time.
    pub fn invoke_mutators(&mut self) -> Result<(), BufferError> {
        mutator_reset(&mut self.leds, self.layout.num_leds)?;
        for motion in &self.state.motions {
            if let Some(mutator) = motion.mutator() {
                mutator.apply(&mut self.leds, self.layout)?;
            }
        }
        Ok(())
    }

    /// Render one frame if the update interval has elapsed
    ///
    /// Runs every active motion effect once, in list order, then flushes.
    /// Returns whether a frame was rendered.
    pub fn tick(&mut self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last_render);
        if elapsed < self.state.update_interval {
            return false;
        }

        let EffectState {
            motions,
            oscillator,
            brightness_setpoint,
            ..
        } = &mut self.state;
        for motion in motions.iter() {
            if let Err(e) = motion
                .transform()
                .apply(&mut self.leds, oscillator, *brightness_setpoint)
            {
                log::error!("motion {} failed: {}", motion.as_str(), e);
            }
        }

        self.flush();
        self.last_render = now;
        true
    }

    /// Paint a single pedal of the unmutated strip
    pub fn set_pedal(&mut self, pedal: usize, color: Rgb) -> Result<(), BufferError> {
        for index in self.layout.pedal_range(pedal) {
            self.leds.set(index, color)?;
        }
        self.invoke_mutators()?;
        self.flush();
        Ok(())
    }

    /// Send the current frame to the output driver
    pub fn flush(&mut self) {
        self.leds.flush(&mut self.output);
    }

    /// Non-default part of the effect state as a flat key-value object
    ///
    /// This is what gets persisted and reported to connected clients.
    pub fn snapshot(&self) -> Map<String, Value> {
        let mut state = Map::new();
        if let Some(name) = self.identity.name {
            state.insert(KEY_NAME.into(), Value::from(name));
        }
        if let Some(id) = self.identity.id {
            state.insert(KEY_ID.into(), Value::from(id));
        }
        if let Some(color) = self.state.color {
            state.insert(KEY_COLOR.into(), Value::from(color.to_string()));
        }
        if !self.state.motions.is_empty() {
            let motions: Vec<Value> = self
                .state
                .motions
                .iter()
                .map(|motion| Value::from(motion.as_str()))
                .collect();
            state.insert(KEY_MOTION.into(), Value::Array(motions));
        }
        if self.state.update_interval != self.default_update_interval {
            state.insert(KEY_SPEED.into(), Value::from(speed_string(self.state.update_interval)));
        }
        if (self.state.brightness_setpoint - self.default_brightness).abs() > f32::EPSILON {
            state.insert(
                KEY_BRIGHTNESS.into(),
                Value::from(percent_string(self.state.brightness_setpoint)),
            );
        }
        state
    }

    pub fn mode(&self) -> EngineMode {
        if self.state.motions.is_empty() {
            EngineMode::Idle
        } else {
            EngineMode::Animating
        }
    }

    pub const fn state(&self) -> &EffectState {
        &self.state
    }

    pub const fn leds(&self) -> &LedBuffer<MAX_LEDS> {
        &self.leds
    }

    pub const fn layout(&self) -> PedalLayout {
        self.layout
    }

    pub const fn update_interval(&self) -> Duration {
        self.state.update_interval
    }

    pub const fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
}

/// Renders per second for an interval, `0` when rendering every tick
#[allow(clippy::cast_precision_loss)]
fn speed_string(interval: Duration) -> String {
    let micros = interval.as_micros();
    if micros == 0 {
        return "0".into();
    }
    (1_000_000.0 / micros as f32).to_string()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent_string(brightness: f32) -> String {
    (libm::roundf(brightness * 100.0) as u32).to_string()
}

#![no_std]

extern crate alloc;

pub mod buffer;
pub mod color;
pub mod command;
pub mod config;
pub mod effect;
pub mod engine;
pub mod flower;
pub mod frame_scheduler;
pub mod logging;
pub mod operation;
pub mod pedal;
pub mod persistence;
pub mod runtime;
pub mod transport;

pub use buffer::{BufferError, LedBuffer};
pub use command::{Command, CommandError, CommandPlan};
pub use config::FlowerConfig;
pub use effect::{ColorEffect, EffectError, MotionEffect, MotionList, Mutator, Transform};
pub use engine::{AnimationEngine, EffectState, EngineMode};
pub use flower::Flower;
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use operation::{Operation, OperationList};
pub use pedal::PedalLayout;
pub use persistence::{
    MemoryStorage, PersistDebouncer, PersistenceError, PersistentStore, Storage,
};
pub use runtime::{CommandChannel, CooperativeLoop, EngineRunner, StateSignal};
pub use transport::{CommandSource, MessageAssembler, StateSink, TransportError};

pub use color::Rgb;
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The animation engine is generic over this trait.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}

use alloc::string::String;

use embassy_time::Instant;
use serde_json::{Map, Value};

use crate::OutputDriver;
use crate::buffer::BufferError;
use crate::command::{Command, CommandError};
use crate::config::FlowerConfig;
use crate::engine::AnimationEngine;
use crate::persistence::{PersistDebouncer, PersistenceError, PersistentStore, Storage};

/// A flower device: animation engine plus debounced persistence
///
/// On construction the persisted snapshot is replayed through the regular
/// command path, so the flower comes back up the way it was left.
pub struct Flower<O: OutputDriver, S: Storage, const MAX_LEDS: usize> {
    engine: AnimationEngine<O, MAX_LEDS>,
    store: PersistentStore<S>,
    debouncer: PersistDebouncer,
    terminator: &'static str,
}

impl<O: OutputDriver, S: Storage, const MAX_LEDS: usize> Flower<O, S, MAX_LEDS> {
    pub fn new(
        config: &FlowerConfig,
        output: O,
        storage: S,
        now: Instant,
    ) -> Result<Self, BufferError> {
        let mut engine = AnimationEngine::new(config, output, now)?;
        let mut store = PersistentStore::new(storage);

        let persisted = store.load();
        if !persisted.is_empty() {
            log::info!("flower: restoring {} persisted keys", persisted.len());
            match Command::from_map(persisted) {
                Ok(command) => {
                    if let Err(e) = engine.pollinate(&command) {
                        log::warn!("flower: persisted state partially restored: {}", e);
                    }
                }
                Err(e) => log::warn!("flower: persisted state ignored: {}", e),
            }
        }

        Ok(Self {
            engine,
            store,
            debouncer: PersistDebouncer::new(config.persist_delay),
            terminator: config.msg_terminator,
        })
    }

    /// Apply a decoded command and schedule a persistence write
    ///
    /// Nothing is scheduled when every field of the command was rejected.
    pub fn pollinate(&mut self, command: &Command, now: Instant) -> Result<(), CommandError> {
        let plan = command.plan();
        let changed = !plan.operations.is_empty();
        let result = self.engine.execute(plan);
        if changed {
            self.debouncer.mark(now);
        }
        result
    }

    /// Decode and apply one framed message
    pub fn handle_message(&mut self, message: &str, now: Instant) -> Result<(), CommandError> {
        log::debug!("flower: received {}", message);
        let command = Command::from_json(message)?;
        self.pollinate(&command, now)
    }

    /// Render if due, then persist if the debounce delay has passed
    ///
    /// Persistence failures are logged and never stop rendering. Returns
    /// whether a frame was rendered.
    pub fn poll(&mut self, now: Instant) -> bool {
        let rendered = self.engine.tick(now);
        if self.debouncer.due(now) {
            if let Err(e) = self.persist() {
                log::error!("flower: failed to persist state: {}", e);
            }
        }
        rendered
    }

    /// Write the current snapshot immediately
    pub fn persist(&mut self) -> Result<(), PersistenceError> {
        let snapshot = self.engine.snapshot();
        log::debug!("flower: persisting {} keys", snapshot.len());
        self.store.save_merged(&snapshot)
    }

    /// Current reportable state
    pub fn current_state(&self) -> Map<String, Value> {
        self.engine.snapshot()
    }

    /// Current state as a framed JSON message
    pub fn state_message(&self) -> String {
        let mut message = serde_json::to_string(&self.current_state()).unwrap_or_default();
        message.push_str(self.terminator);
        message
    }

    /// Forget the persisted state; the running state is kept
    pub fn clear_persistent_state(&mut self) -> Result<(), PersistenceError> {
        log::info!("flower: clearing persistent state");
        self.store.clear()
    }

    pub const fn has_pending_write(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub const fn engine(&self) -> &AnimationEngine<O, MAX_LEDS> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut AnimationEngine<O, MAX_LEDS> {
        &mut self.engine
    }

    pub const fn store(&self) -> &PersistentStore<S> {
        &self.store
    }

    pub const fn debouncer(&self) -> &PersistDebouncer {
        &self.debouncer
    }
}

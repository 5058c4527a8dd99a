//! Persistence of the engine snapshot
//!
//! The snapshot is a flat JSON object. Writes merge onto whatever is already
//! stored, so keys from earlier commands survive later ones. Corrupt content
//! is treated as an empty object and the storage is cleared.

use alloc::string::String;
use alloc::vec;
use core::fmt;

use embassy_time::{Duration, Instant};
use serde_json::{Map, Value};

/// Fixed-size non-volatile region holding the persisted snapshot
pub trait Storage {
    type Error: fmt::Debug;

    /// Size of the region in bytes
    fn capacity(&self) -> usize;

    /// Read the stored content into `buf`, returning the number of bytes read
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Replace the stored content with `data`
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Erase the stored content
    fn clear(&mut self) -> Result<(), Self::Error>;
}

/// Errors raised by [`PersistentStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Stored content is not a JSON object
    Corrupt,
    /// Serialized snapshot does not fit into the storage region
    CapacityExceeded { len: usize, capacity: usize },
    /// Underlying storage failed
    Storage,
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Corrupt => write!(f, "stored state is corrupt"),
            PersistenceError::CapacityExceeded { len, capacity } => write!(
                f,
                "state of {} bytes does not fit into {} bytes of storage",
                len, capacity
            ),
            PersistenceError::Storage => write!(f, "storage driver error"),
        }
    }
}

impl core::error::Error for PersistenceError {}

/// RAM-backed [`Storage`], NUL padded like a raw flash region
#[derive(Debug, Clone)]
pub struct MemoryStorage<const N: usize> {
    data: [u8; N],
    writes: usize,
}

/// Error returned by [`MemoryStorage`] on oversized writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStorageFull;

impl<const N: usize> MemoryStorage<N> {
    pub const fn new() -> Self {
        Self {
            data: [0; N],
            writes: 0,
        }
    }

    /// Create a region pre-filled with `content`, truncated to `N` bytes
    pub fn with_content(content: &[u8]) -> Self {
        let mut storage = Self::new();
        let len = content.len().min(N);
        storage.data[..len].copy_from_slice(&content[..len]);
        storage
    }

    /// Stored bytes up to the first NUL
    pub fn content(&self) -> &[u8] {
        let end = self.data.iter().position(|&b| b == 0).unwrap_or(N);
        &self.data[..end]
    }

    /// Number of successful writes, including clears
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl<const N: usize> Default for MemoryStorage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Storage for MemoryStorage<N> {
    type Error = MemoryStorageFull;

    fn capacity(&self) -> usize {
        N
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let content = self.content();
        let len = content.len().min(buf.len());
        buf[..len].copy_from_slice(&content[..len]);
        Ok(len)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if data.len() > N {
            return Err(MemoryStorageFull);
        }
        self.data[..data.len()].copy_from_slice(data);
        self.data[data.len()..].fill(0);
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.data.fill(0);
        self.writes += 1;
        Ok(())
    }
}

/// Merge-on-write JSON store on top of a [`Storage`]
pub struct PersistentStore<S: Storage> {
    storage: S,
}

impl<S: Storage> PersistentStore<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Read the stored object
    ///
    /// Empty or unreadable storage yields an empty object. Corrupt content is
    /// logged, cleared and also yields an empty object.
    pub fn load(&mut self) -> Map<String, Value> {
        match self.try_load() {
            Ok(state) => state,
            Err(PersistenceError::Corrupt) => {
                log::warn!("persistence: stored state is corrupt, clearing");
                if let Err(e) = self.storage.clear() {
                    log::error!("persistence: failed to clear storage: {:?}", e);
                }
                Map::new()
            }
            Err(e) => {
                log::error!("persistence: {}", e);
                Map::new()
            }
        }
    }

    /// Read the stored object without recovering from corruption
    pub fn try_load(&mut self) -> Result<Map<String, Value>, PersistenceError> {
        let mut buf = vec![0u8; self.storage.capacity()];
        let len = self.storage.read(&mut buf).map_err(|e| {
            log::error!("persistence: read failed: {:?}", e);
            PersistenceError::Storage
        })?;
        let content = trim_padding(&buf[..len]);
        if content.is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_slice::<Value>(content) {
            Ok(Value::Object(state)) => Ok(state),
            _ => Err(PersistenceError::Corrupt),
        }
    }

    /// Merge `snapshot` onto the stored object and write the result
    ///
    /// Keys in `snapshot` replace stored ones, other stored keys are kept.
    /// When the merged object does not fit, nothing is written.
    pub fn save_merged(&mut self, snapshot: &Map<String, Value>) -> Result<(), PersistenceError> {
        let mut state = self.load();
        for (key, value) in snapshot {
            state.insert(key.clone(), value.clone());
        }

        let payload =
            serde_json::to_vec(&Value::Object(state)).map_err(|_| PersistenceError::Corrupt)?;
        let capacity = self.storage.capacity();
        if payload.len() > capacity {
            return Err(PersistenceError::CapacityExceeded {
                len: payload.len(),
                capacity,
            });
        }

        self.storage.write(&payload).map_err(|e| {
            log::error!("persistence: write failed: {:?}", e);
            PersistenceError::Storage
        })?;
        log::debug!("persistence: saved {} bytes", payload.len());
        Ok(())
    }

    /// Erase the persisted state
    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.storage.clear().map_err(|e| {
            log::error!("persistence: clear failed: {:?}", e);
            PersistenceError::Storage
        })
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}

fn trim_padding(content: &[u8]) -> &[u8] {
    let end = content
        .iter()
        .position(|&b| b == 0 || b == 0xff)
        .unwrap_or(content.len());
    content[..end].trim_ascii()
}

/// Delays persistence until changes stop for `delay`
///
/// Every [`mark`](Self::mark) restarts the quiet period, so a burst of
/// commands results in a single write.
#[derive(Debug, Clone, Copy)]
pub struct PersistDebouncer {
    delay: Duration,
    pending_since: Option<Instant>,
}

impl PersistDebouncer {
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending_since: None,
        }
    }

    /// Record a change at `now`
    pub fn mark(&mut self, now: Instant) {
        self.pending_since = Some(now);
    }

    /// Whether a change is waiting to be persisted
    pub const fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Whether the quiet period has passed
    ///
    /// Returning `true` consumes the pending change.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.pending_since {
            Some(since) if now.saturating_duration_since(since) >= self.delay => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }

    /// Time left until the pending change is due
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending_since.map(|since| {
            let elapsed = now.saturating_duration_since(since);
            if elapsed >= self.delay {
                Duration::from_ticks(0)
            } else {
                self.delay - elapsed
            }
        })
    }
}

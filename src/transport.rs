//! Transport boundary
//!
//! Messages arrive as byte chunks (UART reads, BLE characteristic writes)
//! and are framed by a terminator sequence. [`MessageAssembler`] keeps
//! partial messages across read timeouts and tracks connection inactivity.

use alloc::string::String;
use core::fmt;

use embassy_time::{Duration, Instant};
use heapless::Vec;

/// Errors raised at the transport boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// A single read attempt timed out; treated as "no message"
    Timeout,
    /// No complete message within the inactivity window
    Inactive,
    /// Partial message outgrew the assembly buffer
    MessageTooLong { capacity: usize },
    /// Framed message is not valid UTF-8
    InvalidUtf8,
    /// Peer went away
    Closed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Timeout => write!(f, "read timed out"),
            TransportError::Inactive => write!(f, "connection inactive"),
            TransportError::MessageTooLong { capacity } => {
                write!(f, "message longer than {} bytes", capacity)
            }
            TransportError::InvalidUtf8 => write!(f, "message is not valid UTF-8"),
            TransportError::Closed => write!(f, "connection closed"),
        }
    }
}

impl core::error::Error for TransportError {}

/// Source of inbound command bytes
#[allow(async_fn_in_trait)]
pub trait CommandSource {
    /// Read the next chunk into `buf`, returning its length
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;
}

/// Destination of outbound state reports
#[allow(async_fn_in_trait)]
pub trait StateSink {
    /// Write one framed state message
    async fn write(&mut self, payload: &[u8]) -> Result<(), TransportError>;
}

/// Terminator-framed message reassembly
#[derive(Debug)]
pub struct MessageAssembler<const N: usize> {
    buf: Vec<u8, N>,
    terminator: &'static str,
    inactive_lifetime: Duration,
    last_message: Instant,
}

impl<const N: usize> MessageAssembler<N> {
    pub fn new(terminator: &'static str, inactive_lifetime: Duration, now: Instant) -> Self {
        Self {
            buf: Vec::new(),
            terminator,
            inactive_lifetime,
            last_message: now,
        }
    }

    /// Append a received chunk
    ///
    /// On overflow the partial message is dropped.
    pub fn push(&mut self, chunk: &[u8]) -> Result<(), TransportError> {
        if self.buf.extend_from_slice(chunk).is_err() {
            self.buf.clear();
            log::error!("transport: message exceeds {} bytes, dropped", N);
            return Err(TransportError::MessageTooLong { capacity: N });
        }
        Ok(())
    }

    /// Take the next complete message, if any
    ///
    /// Bytes after the terminator stay buffered for the next call. Blank
    /// messages are skipped.
    pub fn next_message(&mut self, now: Instant) -> Option<Result<String, TransportError>> {
        let terminator = self.terminator.as_bytes();
        if terminator.is_empty() {
            return None;
        }

        loop {
            let end = self
                .buf
                .windows(terminator.len())
                .position(|window| window == terminator)?;
            let message = core::str::from_utf8(&self.buf[..end])
                .map(|s| String::from(s.trim()))
                .map_err(|_| TransportError::InvalidUtf8);

            let consumed = end + terminator.len();
            let len = self.buf.len();
            self.buf.rotate_left(consumed);
            self.buf.truncate(len - consumed);
            self.last_message = now;

            match message {
                Ok(message) if message.is_empty() => continue,
                message => return Some(message),
            }
        }
    }

    /// Fail with [`TransportError::Inactive`] once no message arrived for the
    /// inactivity window
    pub fn check_inactivity(&self, now: Instant) -> Result<(), TransportError> {
        if now.saturating_duration_since(self.last_message) > self.inactive_lifetime {
            return Err(TransportError::Inactive);
        }
        Ok(())
    }

    /// Restart the inactivity window, e.g. on a new connection
    pub fn reset(&mut self, now: Instant) {
        self.buf.clear();
        self.last_message = now;
    }

    /// Bytes of the message currently being assembled
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    pub const fn terminator(&self) -> &'static str {
        self.terminator
    }
}

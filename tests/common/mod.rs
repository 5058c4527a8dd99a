#![allow(dead_code)]

use std::collections::VecDeque;
use std::vec::Vec;

use flower_light_engine::transport::{CommandSource, StateSink, TransportError};
use flower_light_engine::{OutputDriver, Rgb};

pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
pub const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
pub const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};

/// Output driver that keeps every written frame
#[derive(Debug, Default)]
pub struct RecordingDriver {
    pub frames: Vec<Vec<Rgb>>,
}

impl RecordingDriver {
    pub fn last(&self) -> Option<&[Rgb]> {
        self.frames.last().map(Vec::as_slice)
    }
}

impl OutputDriver for RecordingDriver {
    fn write(&mut self, colors: &[Rgb]) {
        self.frames.push(colors.to_vec());
    }
}

/// Command source replaying scripted chunks, closed once they run out
#[derive(Debug, Default)]
pub struct ScriptedSource {
    chunks: VecDeque<Vec<u8>>,
}

impl ScriptedSource {
    pub fn new(chunks: &[&str]) -> Self {
        Self {
            chunks: chunks.iter().map(|chunk| chunk.as_bytes().to_vec()).collect(),
        }
    }
}

impl CommandSource for ScriptedSource {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let Some(chunk) = self.chunks.pop_front() else {
            return Err(TransportError::Closed);
        };
        let len = chunk.len().min(buf.len());
        buf[..len].copy_from_slice(&chunk[..len]);
        if len < chunk.len() {
            self.chunks.push_front(chunk[len..].to_vec());
        }
        Ok(len)
    }
}

/// State sink that records one payload and then reports the peer as gone
#[derive(Debug, Default)]
pub struct ClosingSink {
    pub written: Vec<Vec<u8>>,
}

impl StateSink for ClosingSink {
    async fn write(&mut self, payload: &[u8]) -> Result<(), TransportError> {
        self.written.push(payload.to_vec());
        Err(TransportError::Closed)
    }
}

//! Run loops around a [`Flower`]
//!
//! Two shapes are provided:
//! - [`CooperativeLoop`]: one synchronous loop that feeds transport bytes,
//!   renders and persists in sequence. The caller sleeps between steps.
//! - Async tasks on top of `embassy-sync`: [`command_task`] turns transport
//!   bytes into commands, [`EngineRunner`] owns the flower and renders, and
//!   [`state_task`] pushes state reports to a [`StateSink`].
//!
//! The flower is owned by exactly one loop; other tasks only talk to it over
//! the command channel and the state signal.

use alloc::string::String;

use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Timer, with_timeout};

use crate::OutputDriver;
use crate::command::Command;
use crate::flower::Flower;
use crate::frame_scheduler::{FrameResult, FrameScheduler};
use crate::persistence::Storage;
use crate::transport::{CommandSource, MessageAssembler, StateSink, TransportError};

/// Size of a single transport read
pub const READ_CHUNK_SIZE: usize = 64;

pub type CommandChannel<const N: usize> = Channel<CriticalSectionRawMutex, Command, N>;
pub type CommandSender<'a, const N: usize> = Sender<'a, CriticalSectionRawMutex, Command, N>;
pub type CommandReceiver<'a, const N: usize> = Receiver<'a, CriticalSectionRawMutex, Command, N>;

/// Latest framed state report, older unsent reports are replaced
pub type StateSignal = Signal<CriticalSectionRawMutex, String>;

/// Outcome of one [`CooperativeLoop::step`]
#[derive(Debug, Clone, Copy)]
pub struct StepResult {
    pub frame: FrameResult,
    /// A frame was rendered during this step
    pub rendered: bool,
    /// No message arrived within the inactivity window; the connection
    /// should be dropped and advertising restarted
    pub inactive: bool,
}

/// Single-threaded loop: transport, pollinate, render, persist
pub struct CooperativeLoop<O: OutputDriver, S: Storage, const MAX_LEDS: usize, const N: usize> {
    flower: Flower<O, S, MAX_LEDS>,
    assembler: MessageAssembler<N>,
    scheduler: FrameScheduler,
}

impl<O: OutputDriver, S: Storage, const MAX_LEDS: usize, const N: usize>
    CooperativeLoop<O, S, MAX_LEDS, N>
{
    pub fn new(
        flower: Flower<O, S, MAX_LEDS>,
        assembler: MessageAssembler<N>,
        scheduler: FrameScheduler,
    ) -> Self {
        Self {
            flower,
            assembler,
            scheduler,
        }
    }

    /// Run one iteration with the bytes received since the last one
    pub fn step(&mut self, chunk: Option<&[u8]>, now: Instant) -> StepResult {
        if let Some(chunk) = chunk {
            // Overflow is logged by the assembler; the partial message is gone.
            let _ = self.assembler.push(chunk);
        }

        while let Some(message) = self.assembler.next_message(now) {
            match message {
                Ok(message) => {
                    // Rejections are logged by the command path.
                    let _ = self.flower.handle_message(&message, now);
                }
                Err(e) => log::error!("transport: {}", e),
            }
        }

        let rendered = self.flower.poll(now);
        let frame = self.scheduler.tick(now);

        let inactive = self.assembler.check_inactivity(now).is_err();
        if inactive {
            log::info!("transport: inactive lifetime reached");
        }

        StepResult {
            frame,
            rendered,
            inactive,
        }
    }

    /// Start over with a fresh connection
    pub fn reconnect(&mut self, now: Instant) {
        self.assembler.reset(now);
    }

    pub const fn flower(&self) -> &Flower<O, S, MAX_LEDS> {
        &self.flower
    }

    pub fn flower_mut(&mut self) -> &mut Flower<O, S, MAX_LEDS> {
        &mut self.flower
    }
}

/// Read until a complete message is assembled
///
/// Every read attempt is bounded by `read_timeout`; partial messages are
/// kept across timeouts. Fails with [`TransportError::Inactive`] once the
/// assembler's inactivity window has passed.
pub async fn read_message<C: CommandSource, const N: usize>(
    source: &mut C,
    assembler: &mut MessageAssembler<N>,
    read_timeout: Duration,
) -> Result<String, TransportError> {
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        let now = Instant::now();
        if let Some(message) = assembler.next_message(now) {
            return message;
        }
        assembler.check_inactivity(now)?;

        match with_timeout(read_timeout, source.read(&mut chunk)).await {
            Ok(Ok(0)) => Timer::after_millis(1).await,
            Ok(Ok(len)) => {
                let _ = assembler.push(&chunk[..len]);
            }
            Ok(Err(TransportError::Timeout)) | Err(_) => {
                if !assembler.pending().is_empty() {
                    log::debug!("transport: read timed out with a partial message");
                }
            }
            Ok(Err(e)) => return Err(e),
        }
    }
}

/// Forward decoded commands from `source` to the engine
///
/// Returns the error that ended the connection.
pub async fn command_task<C: CommandSource, const N: usize, const CAP: usize>(
    source: &mut C,
    assembler: &mut MessageAssembler<N>,
    sender: CommandSender<'_, CAP>,
    read_timeout: Duration,
) -> TransportError {
    log::info!("transport: command task started");
    loop {
        match read_message(source, assembler, read_timeout).await {
            Ok(message) => {
                log::debug!("transport: received {}", message);
                if let Ok(command) = Command::from_json(&message) {
                    sender.send(command).await;
                }
            }
            Err(e @ (TransportError::InvalidUtf8 | TransportError::MessageTooLong { .. })) => {
                log::error!("transport: {}", e);
            }
            Err(e) => {
                log::info!("transport: command task stopped: {}", e);
                return e;
            }
        }
    }
}

/// Push every signalled state report to `sink`
///
/// Returns once the sink is closed.
pub async fn state_task<K: StateSink>(sink: &mut K, signal: &StateSignal) -> TransportError {
    loop {
        let message = signal.wait().await;
        match sink.write(message.as_bytes()).await {
            Ok(()) => {}
            Err(TransportError::Closed) => return TransportError::Closed,
            Err(e) => log::error!("transport: failed to send state: {}", e),
        }
    }
}

/// Async owner of the flower
///
/// Waits for either the next command or the next tick deadline, whichever
/// comes first.
pub struct EngineRunner<'a, O: OutputDriver, S: Storage, const MAX_LEDS: usize, const CAP: usize> {
    flower: Flower<O, S, MAX_LEDS>,
    receiver: CommandReceiver<'a, CAP>,
    scheduler: FrameScheduler,
    next_deadline: Instant,
    state: Option<&'a StateSignal>,
}

impl<'a, O: OutputDriver, S: Storage, const MAX_LEDS: usize, const CAP: usize>
    EngineRunner<'a, O, S, MAX_LEDS, CAP>
{
    pub fn new(
        flower: Flower<O, S, MAX_LEDS>,
        receiver: CommandReceiver<'a, CAP>,
        scheduler: FrameScheduler,
    ) -> Self {
        Self {
            flower,
            receiver,
            scheduler,
            next_deadline: Instant::now(),
            state: None,
        }
    }

    /// Report the state on `signal` after every applied command
    #[must_use]
    pub fn with_state_signal(mut self, signal: &'a StateSignal) -> Self {
        self.state = Some(signal);
        self
    }

    /// Publish the current state, e.g. when a client connects
    pub fn notify_state(&self) {
        if let Some(signal) = self.state {
            signal.signal(self.flower.state_message());
        }
    }

    /// Handle one command or one tick; returns whether a frame was rendered
    pub async fn step(&mut self) -> bool {
        match select(self.receiver.receive(), Timer::at(self.next_deadline)).await {
            Either::First(command) => {
                // Rejections are logged by the command path.
                let _ = self.flower.pollinate(&command, Instant::now());
                self.notify_state();
                false
            }
            Either::Second(()) => {
                let now = Instant::now();
                let rendered = self.flower.poll(now);
                self.next_deadline = self.scheduler.tick(now).next_deadline;
                rendered
            }
        }
    }

    pub async fn run(&mut self) -> ! {
        log::info!("engine: started");
        loop {
            self.step().await;
        }
    }

    pub const fn flower(&self) -> &Flower<O, S, MAX_LEDS> {
        &self.flower
    }

    pub fn flower_mut(&mut self) -> &mut Flower<O, S, MAX_LEDS> {
        &mut self.flower
    }
}

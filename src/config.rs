use embassy_time::Duration;

/// Outer tick cadence of the render loop.
pub const DEFAULT_REFRESH_RATE: Duration = Duration::from_millis(10);

/// Time between renders until a `rate`/`speed` command says otherwise.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(1000);

/// Bound on a single transport read attempt.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Connection is reset when no complete message arrives within this window.
pub const DEFAULT_INACTIVE_LIFETIME: Duration = Duration::from_secs(120);

/// Quiet period before state is written to persistent storage.
pub const DEFAULT_PERSIST_DELAY: Duration = Duration::from_secs(2);

pub const DEFAULT_BRIGHTNESS: f32 = 1.0;
pub const DEFAULT_MSG_TERMINATOR: &str = "\n";

/// Configuration for a flower device
#[derive(Debug, Clone)]
pub struct FlowerConfig {
    /// Device name reported as `n` in the state snapshot
    pub name: Option<&'static str>,
    /// Device id reported as `id` in the state snapshot
    pub id: Option<u32>,
    /// Number of physical LEDs
    pub num_leds: usize,
    /// LEDs per pedal
    pub pedal_length: usize,
    pub refresh_rate: Duration,
    pub update_interval: Duration,
    /// Initial brightness setpoint (0.0-1.0)
    pub brightness: f32,
    pub msg_terminator: &'static str,
    pub read_timeout: Duration,
    pub inactive_lifetime: Duration,
    pub persist_delay: Duration,
}

impl FlowerConfig {
    pub const fn new(num_leds: usize, pedal_length: usize) -> Self {
        Self {
            name: None,
            id: None,
            num_leds,
            pedal_length,
            refresh_rate: DEFAULT_REFRESH_RATE,
            update_interval: DEFAULT_UPDATE_INTERVAL,
            brightness: DEFAULT_BRIGHTNESS,
            msg_terminator: DEFAULT_MSG_TERMINATOR,
            read_timeout: DEFAULT_READ_TIMEOUT,
            inactive_lifetime: DEFAULT_INACTIVE_LIFETIME,
            persist_delay: DEFAULT_PERSIST_DELAY,
        }
    }

    /// Set the device identity reported in state snapshots
    #[must_use]
    pub const fn with_identity(mut self, name: &'static str, id: u32) -> Self {
        self.name = Some(name);
        self.id = Some(id);
        self
    }

    #[must_use]
    pub const fn with_refresh_rate(mut self, refresh_rate: Duration) -> Self {
        self.refresh_rate = refresh_rate;
        self
    }

    #[must_use]
    pub const fn with_update_interval(mut self, update_interval: Duration) -> Self {
        self.update_interval = update_interval;
        self
    }

    #[must_use]
    pub const fn with_brightness(mut self, brightness: f32) -> Self {
        self.brightness = brightness;
        self
    }

    #[must_use]
    pub const fn with_msg_terminator(mut self, terminator: &'static str) -> Self {
        self.msg_terminator = terminator;
        self
    }

    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_inactive_lifetime(mut self, lifetime: Duration) -> Self {
        self.inactive_lifetime = lifetime;
        self
    }

    #[must_use]
    pub const fn with_persist_delay(mut self, delay: Duration) -> Self {
        self.persist_delay = delay;
        self
    }
}

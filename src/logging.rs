//! Log sink setup.
//!
//! Library code logs through the `log` facade only. The binary installs a
//! sink once at startup; on ESP32 targets with the `esp32-log` feature this
//! is the `esp-println` logger.

pub use log::LevelFilter;

/// Install the serial logger at `level`.
#[cfg(feature = "esp32-log")]
pub fn init(level: LevelFilter) {
    esp_println::logger::init_logger(level);
    log::info!("logger initialized at {}", level);
}

/// Without a platform sink only the level filter is applied.
#[cfg(not(feature = "esp32-log"))]
pub fn init(level: LevelFilter) {
    log::set_max_level(level);
}

//! `log` backend writing to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
struct ConsoleLogger;

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}: {}", record.level(), record.target(), record.args());
        match record.level() {
            Level::Error => web_sys::console::error_1(&line.into()),
            Level::Warn => web_sys::console::warn_1(&line.into()),
            _ => web_sys::console::log_1(&line.into()),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger once. Later calls only adjust the level.
pub fn init(level: LevelFilter) {
    #[cfg(target_arch = "wasm32")]
    {
        // Already set by an earlier canvas: keep it.
        let _ = log::set_logger(&LOGGER);
    }
    log::set_max_level(level);
}

/// Parse a level name from the host (`"debug"`, `"warn"`, ...).
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.parse().ok()
}

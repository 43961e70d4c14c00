// frontend/src/logging.rs

/// UI-side log line: browser console on wasm, stdout on native.
macro_rules! log {
    ($($t:tt)*) => {{
        let s = format!($($t)*);
        crate::logging::log(&s);
    }}
}

pub fn log(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&msg.into());

    #[cfg(not(target_arch = "wasm32"))]
    println!("{msg}");
}

// `log` facade sink for native builds; wasm uses wasm-logger.
#[cfg(not(target_arch = "wasm32"))]
struct StdoutLogger;

#[cfg(not(target_arch = "wasm32"))]
impl log::Log for StdoutLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            println!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

#[cfg(not(target_arch = "wasm32"))]
static STDOUT_LOGGER: StdoutLogger = StdoutLogger;

#[cfg(not(target_arch = "wasm32"))]
pub fn install_stdout_logger() {
    let level = std::env::var("CIVIX_LOG")
        .ok()
        .and_then(|v| v.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info);
    if log::set_logger(&STDOUT_LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

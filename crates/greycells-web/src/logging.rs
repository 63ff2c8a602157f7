#![forbid(unsafe_code)]

//! Browser console sink for [`SiteLogLayer`].

use greycells_core::config::LogLevel;
use greycells_core::logging::{LogSink, SiteLogLayer};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use wasm_bindgen::JsValue;
use web_sys::console;

/// Writes each record with the console method matching its level.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn write_record(&self, level: Level, line: &str) {
        let line = JsValue::from_str(line);
        match level {
            Level::ERROR => console::error_1(&line),
            Level::WARN => console::warn_1(&line),
            Level::INFO => console::info_1(&line),
            Level::DEBUG | Level::TRACE => console::debug_1(&line),
        }
    }
}

/// Install the console layer as the global subscriber.
///
/// Only the first call wins; later calls (another handle on the same page)
/// keep the existing subscriber.
pub(crate) fn install(level: LogLevel) {
    let subscriber = tracing_subscriber::registry()
        .with(SiteLogLayer::new(ConsoleSink))
        .with(LevelFilter::from_level(level.as_tracing()));
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("log subscriber already installed");
    }
}

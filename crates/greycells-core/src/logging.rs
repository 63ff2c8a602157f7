#![forbid(unsafe_code)]

//! Tracing layer that formats events as single lines and hands them to a
//! pluggable [`LogSink`].
//!
//! The web host plugs in a browser console sink; tests use [`CaptureSink`].
//!
//! ```
//! use greycells_core::logging::{CaptureSink, SiteLogLayer};
//! use tracing_subscriber::prelude::*;
//!
//! let sink = CaptureSink::new();
//! let subscriber = tracing_subscriber::registry().with(SiteLogLayer::new(sink.clone()));
//! tracing::subscriber::with_default(subscriber, || tracing::info!("ready"));
//! assert_eq!(sink.lines().len(), 1);
//! ```

use std::fmt::{self, Write as FmtWrite};
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Destination for formatted log lines.
pub trait LogSink: Send + Sync + 'static {
    fn write_record(&self, level: Level, line: &str);
}

/// Which parts of a record to render.
#[derive(Debug, Clone)]
pub struct LogFormat {
    /// Default: true.
    pub show_level: bool,
    /// Show the tracing target (module path). Default: true.
    pub show_target: bool,
    /// Show structured fields beyond `message`. Default: true.
    pub show_fields: bool,
}

impl Default for LogFormat {
    fn default() -> Self {
        Self {
            show_level: true,
            show_target: true,
            show_fields: true,
        }
    }
}

fn level_str(level: Level) -> &'static str {
    match level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN ",
        Level::INFO => "INFO ",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

/// Extracts message and structured fields from an event.
#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl EventVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        self.push(field, strip_debug_quotes(&rendered).to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.to_string());
    }
}

fn strip_debug_quotes(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// A `tracing_subscriber::Layer` writing one formatted line per event.
pub struct SiteLogLayer<S> {
    sink: S,
    format: LogFormat,
}

impl<S: LogSink> SiteLogLayer<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            format: LogFormat::default(),
        }
    }

    pub fn with_format(sink: S, format: LogFormat) -> Self {
        Self { sink, format }
    }

    #[must_use]
    pub fn show_level(mut self, show: bool) -> Self {
        self.format.show_level = show;
        self
    }

    #[must_use]
    pub fn show_target(mut self, show: bool) -> Self {
        self.format.show_target = show;
        self
    }

    #[must_use]
    pub fn show_fields(mut self, show: bool) -> Self {
        self.format.show_fields = show;
        self
    }

    fn format_event(&self, event: &Event<'_>) -> String {
        let metadata = event.metadata();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let mut line = String::new();
        if self.format.show_level {
            line.push_str(level_str(*metadata.level()));
            line.push(' ');
        }
        if self.format.show_target {
            let _ = write!(line, "{}: ", metadata.target());
        }
        line.push_str(visitor.message.as_deref().unwrap_or_default());
        if self.format.show_fields {
            for (k, v) in &visitor.fields {
                let _ = write!(line, " {k}={v}");
            }
        }
        line
    }
}

impl<S, Sub> Layer<Sub> for SiteLogLayer<S>
where
    S: LogSink,
    Sub: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, Sub>) {
        let line = self.format_event(event);
        self.sink.write_record(*event.metadata().level(), &line);
    }
}

/// Sink that keeps every line in memory.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CaptureSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl LogSink for CaptureSink {
    fn write_record(&self, _level: Level, line: &str) {
        let mut lines = match self.lines.lock() {
            Ok(lines) => lines,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::prelude::*;

    fn capture<F: FnOnce()>(
        layer: SiteLogLayer<CaptureSink>,
        sink: &CaptureSink,
        f: F,
    ) -> Vec<String> {
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, f);
        sink.lines()
    }

    #[test]
    fn formats_message_with_fields_and_target() {
        let sink = CaptureSink::new();
        let lines = capture(SiteLogLayer::new(sink.clone()), &sink, || {
            tracing::info!(target: "site", count = 3, ok = true, "contacts loaded");
        });
        assert_eq!(lines, vec!["INFO  site: contacts loaded count=3 ok=true"]);
    }

    #[test]
    fn bare_message() {
        let sink = CaptureSink::new();
        let layer = SiteLogLayer::new(sink.clone())
            .show_level(false)
            .show_target(false)
            .show_fields(false);
        let lines = capture(layer, &sink, || {
            tracing::warn!(status = 500, "fetch failed");
        });
        assert_eq!(lines, vec!["fetch failed"]);
    }

    #[test]
    fn display_fields_lose_quotes() {
        let sink = CaptureSink::new();
        let layer = SiteLogLayer::new(sink.clone()).show_level(false).show_target(false);
        let lines = capture(layer, &sink, || {
            let err = "HTTP 404";
            tracing::debug!(error = %err, raw = ?"x", "failed");
        });
        assert_eq!(lines, vec!["failed error=HTTP 404 raw=x"]);
    }

    #[test]
    fn level_filter_drops_debug() {
        let sink = CaptureSink::new();
        let subscriber = tracing_subscriber::registry()
            .with(SiteLogLayer::new(sink.clone()).show_target(false))
            .with(tracing_subscriber::filter::LevelFilter::INFO);
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("hidden");
            tracing::error!("shown");
        });
        assert_eq!(sink.lines(), vec!["ERROR shown"]);
    }

    #[test]
    fn strip_quotes() {
        assert_eq!(strip_debug_quotes("\"a\""), "a");
        assert_eq!(strip_debug_quotes("\""), "\"");
        assert_eq!(strip_debug_quotes("3"), "3");
    }
}

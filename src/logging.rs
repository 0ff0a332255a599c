//! Logging integration for the `log` crate.
//!
//! The library itself only emits records through the `log` macros. Binaries
//! that want to see them install [`ConsoleLogger`], which writes one line per
//! record to stderr with an optional timestamp, a colored level and the
//! source location.
//!
//! Optional tracing integration is available via `ConsoleTracingLayer` when the
//! `tracing` feature is enabled.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crossterm::style::Stylize;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use time::{OffsetDateTime, format_description::OwnedFormatItem};

use crate::terminal;

/// Lock a mutex, recovering the guard if a panicking thread poisoned it.
fn lock_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Line-oriented logger for the `log` crate.
///
/// # Thread Safety
///
/// `ConsoleLogger` implements `Log`, which requires `Sync`. The output sink
/// and the last printed timestamp are behind mutexes with poison recovery, so
/// multiple threads can log concurrently and each record stays on one line.
pub struct ConsoleLogger {
    level: LevelFilter,
    show_time: bool,
    omit_repeated_times: bool,
    show_level: bool,
    show_path: bool,
    colors: bool,
    time_format: OwnedFormatItem,
    last_time: Mutex<Option<String>>,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleLogger {
    /// Create a logger writing to stderr with default settings.
    ///
    /// Colors are enabled when stderr is a terminal that allows them.
    #[must_use]
    pub fn new() -> Self {
        let time_format = time::format_description::parse_owned::<2>("[hour]:[minute]:[second]")
            .unwrap_or_else(|_| OwnedFormatItem::Literal(Vec::<u8>::new().into_boxed_slice()));
        Self {
            level: LevelFilter::Info,
            show_time: true,
            omit_repeated_times: true,
            show_level: true,
            show_path: false,
            colors: terminal::stderr_supports_color(),
            time_format,
            last_time: Mutex::new(None),
            sink: Mutex::new(Box::new(io::stderr())),
        }
    }

    /// Set the minimum log level.
    #[must_use]
    pub fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Enable or disable timestamps.
    #[must_use]
    pub fn show_time(mut self, show: bool) -> Self {
        self.show_time = show;
        self
    }

    /// Omit repeated timestamps.
    #[must_use]
    pub fn omit_repeated_times(mut self, omit: bool) -> Self {
        self.omit_repeated_times = omit;
        self
    }

    /// Enable or disable log levels.
    #[must_use]
    pub fn show_level(mut self, show: bool) -> Self {
        self.show_level = show;
        self
    }

    /// Enable or disable the `file:line` suffix.
    #[must_use]
    pub fn show_path(mut self, show: bool) -> Self {
        self.show_path = show;
        self
    }

    /// Force colored levels on or off.
    #[must_use]
    pub fn colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    /// Override time format.
    #[must_use]
    pub fn time_format(mut self, format: &str) -> Self {
        if let Ok(parsed) = time::format_description::parse_owned::<2>(format) {
            self.time_format = parsed;
        }
        self
    }

    /// Write to `writer` instead of stderr.
    #[must_use]
    pub fn with_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.sink = Mutex::new(Box::new(writer));
        self
    }

    /// Install as the global logger.
    ///
    /// # Errors
    ///
    /// Fails if a global logger is already installed.
    pub fn init(self) -> Result<(), SetLoggerError> {
        log::set_max_level(self.level);
        log::set_boxed_logger(Box::new(self))
    }

    fn format_time(&self) -> String {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        now.format(&self.time_format)
            .unwrap_or_else(|_| now.to_string())
    }

    fn styled_level(&self, level: Level) -> String {
        let padded = format!("{level:<5}");
        if !self.colors {
            return padded;
        }
        let styled = match level {
            Level::Trace => padded.dim(),
            Level::Debug => padded.blue(),
            Level::Info => padded.green(),
            Level::Warn => padded.yellow(),
            Level::Error => padded.red().bold(),
        };
        styled.to_string()
    }

    fn format_record(&self, record: &Record<'_>) -> String {
        let mut line = String::new();

        if self.show_time {
            let time_str = self.format_time();
            let display = if self.omit_repeated_times {
                let mut last = lock_recover(&self.last_time);
                if last.as_ref() == Some(&time_str) {
                    " ".repeat(time_str.len())
                } else {
                    *last = Some(time_str.clone());
                    time_str
                }
            } else {
                time_str
            };
            line.push_str(&display);
            line.push(' ');
        }

        if self.show_level {
            line.push_str(&self.styled_level(record.level()));
            line.push(' ');
        }

        let _ = write!(line, "{}", record.args());

        if self.show_path
            && let Some(path) = record.file()
        {
            let _ = write!(line, " {path}");
            if let Some(line_no) = record.line() {
                let _ = write!(line, ":{line_no}");
            }
        }

        line
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = self.format_record(record);
        let mut sink = lock_recover(&self.sink);
        // A logger has nowhere to report its own write failures.
        let _ = writeln!(sink, "{line}");
    }

    fn flush(&self) {
        let _ = lock_recover(&self.sink).flush();
    }
}

#[cfg(feature = "tracing")]
mod tracing_integration {
    use super::ConsoleLogger;
    use log::{Level, Log};
    use std::fmt::Debug;

    use tracing::field::{Field, Visit};
    use tracing::{Event, Level as TracingLevel, Subscriber};
    use tracing_subscriber::{Layer, layer::Context};

    /// Tracing layer that formats events using `ConsoleLogger` styling.
    pub struct ConsoleTracingLayer {
        logger: ConsoleLogger,
    }

    impl ConsoleTracingLayer {
        /// Create a tracing layer backed by a default `ConsoleLogger`.
        #[must_use]
        pub fn new() -> Self {
            Self {
                logger: ConsoleLogger::new(),
            }
        }

        /// Use an existing logger configuration.
        #[must_use]
        pub fn with_logger(logger: ConsoleLogger) -> Self {
            Self { logger }
        }

        /// Install as the global tracing subscriber.
        ///
        /// # Errors
        ///
        /// Fails if a global subscriber is already installed.
        pub fn init(self) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
            use tracing_subscriber::prelude::*;

            let subscriber = tracing_subscriber::registry().with(self);
            tracing::subscriber::set_global_default(subscriber)
        }
    }

    impl Default for ConsoleTracingLayer {
        fn default() -> Self {
            Self::new()
        }
    }

    #[derive(Default)]
    struct EventVisitor {
        message: Option<String>,
        fields: Vec<(String, String)>,
    }

    impl Visit for EventVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
            let rendered = format!("{value:?}");
            let rendered = strip_quotes(&rendered).to_string();
            if field.name() == "message" {
                self.message = Some(rendered);
            } else {
                self.fields.push((field.name().to_string(), rendered));
            }
        }
    }

    impl<S> Layer<S> for ConsoleTracingLayer
    where
        S: Subscriber,
    {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let metadata = event.metadata();
            let mut visitor = EventVisitor::default();
            event.record(&mut visitor);

            let mut message = visitor.message.unwrap_or_default();
            if !visitor.fields.is_empty() {
                let extra = visitor
                    .fields
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                if message.is_empty() {
                    message = extra;
                } else {
                    message.push(' ');
                    message.push_str(&extra);
                }
            }

            let message_ref = message.as_str();
            let args = format_args!("{message_ref}");
            let record = log::Record::builder()
                .args(args)
                .level(map_tracing_level(*metadata.level()))
                .target(metadata.target())
                .file(metadata.file())
                .line(metadata.line())
                .module_path(metadata.module_path())
                .build();

            self.logger.log(&record);
        }
    }

    fn map_tracing_level(level: TracingLevel) -> Level {
        match level {
            TracingLevel::TRACE => Level::Trace,
            TracingLevel::DEBUG => Level::Debug,
            TracingLevel::INFO => Level::Info,
            TracingLevel::WARN => Level::Warn,
            TracingLevel::ERROR => Level::Error,
        }
    }

    fn strip_quotes(value: &str) -> &str {
        if value.len() >= 2 && value.starts_with('\"') && value.ends_with('\"') {
            &value[1..value.len() - 1]
        } else {
            value
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::io::{self, Write};
        use std::sync::{Arc, Mutex};
        use tracing_subscriber::prelude::*;

        #[test]
        fn test_strip_quotes() {
            assert_eq!(strip_quotes("\"hello\""), "hello");
            assert_eq!(strip_quotes("plain"), "plain");
            assert_eq!(strip_quotes("\"\""), "");
            assert_eq!(strip_quotes("\""), "\"");
        }

        #[derive(Clone, Default)]
        struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

        impl SharedBuffer {
            fn contents(&self) -> String {
                String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
            }
        }

        impl Write for SharedBuffer {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        fn layer_into(buffer: &SharedBuffer) -> ConsoleTracingLayer {
            let logger = ConsoleLogger::new()
                .level(log::LevelFilter::Debug)
                .show_time(false)
                .colors(false)
                .with_writer(buffer.clone());
            ConsoleTracingLayer::with_logger(logger)
        }

        #[test]
        fn test_tracing_event_reaches_logger() {
            let buffer = SharedBuffer::default();
            let subscriber = tracing_subscriber::registry().with(layer_into(&buffer));

            tracing::subscriber::with_default(subscriber, || tracing::info!(k = 1, "hi"));

            assert_eq!(buffer.contents(), "INFO  hi k=1\n");
        }

        #[test]
        fn test_tracing_event_respects_logger_level() {
            let buffer = SharedBuffer::default();
            let subscriber = tracing_subscriber::registry().with(layer_into(&buffer));

            tracing::subscriber::with_default(subscriber, || {
                tracing::trace!("hidden");
                tracing::warn!(channel = "red", "clamped");
                tracing::debug!(value = 300);
            });

            assert_eq!(buffer.contents(), "WARN  clamped channel=red\nDEBUG value=300\n");
        }

        #[test]
        fn test_map_tracing_level() {
            assert_eq!(map_tracing_level(TracingLevel::TRACE), Level::Trace);
            assert_eq!(map_tracing_level(TracingLevel::DEBUG), Level::Debug);
            assert_eq!(map_tracing_level(TracingLevel::INFO), Level::Info);
            assert_eq!(map_tracing_level(TracingLevel::WARN), Level::Warn);
            assert_eq!(map_tracing_level(TracingLevel::ERROR), Level::Error);
        }

        #[test]
        fn test_event_visitor_default() {
            let visitor = EventVisitor::default();
            assert!(visitor.message.is_none());
            assert!(visitor.fields.is_empty());
        }
    }
}

#[cfg(feature = "tracing")]
pub use tracing_integration::ConsoleTracingLayer;

//! # Logging & Tracing Infrastructure
//!
//! Installs the global `tracing` subscriber for the navigation bar core.
//!
//! ## Overview
//!
//! The subscriber is assembled from three layers:
//! - an [`EnvFilter`] generated from [`LoggingConfig`] (workspace crates at the
//!   configured level, everything else at `warn`)
//! - a `fmt` layer in the selected [`LogFormat`], writing to stdout
//! - a [`HostLogLayer`] mirroring every surviving event into the host's
//!   [`LoggerSink`] (Logcat, `os_log`, the console)
//!
//! Advisory notices (operations called where there is no navigation bar) are
//! `warn!` events on [`ADVISORY_TARGET`]. They get their own filter directive
//! so hosts can silence them without touching the rest of the output.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::logging::{LogFormat, LoggingConfig, init_logging};
//! use bridge_traits::logging::{ConsoleLogger, LogLevel};
//! use std::sync::Arc;
//!
//! init_logging(
//!     LoggingConfig::default()
//!         .with_format(LogFormat::Compact)
//!         .with_level(LogLevel::Debug)
//!         .with_advisories(false)
//!         .with_logger_sink(Arc::new(ConsoleLogger::default())),
//! )?;
//! ```

use crate::error::{Error, Result};

use bridge_traits::logging::{LogEntry, LogLevel, LoggerSink, ADVISORY_TARGET};

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    filter::EnvFilter,
    fmt::format::FmtSpan,
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
    Layer,
};

/// Crates whose logs follow the configured level; everything else stays at `warn`.
const WORKSPACE_CRATES: &[&str] = &[
    "navbar_workspace",
    "core_navbar",
    "core_runtime",
    "bridge_desktop",
    "bridge_traits",
];

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, coloured
    Pretty,
    /// One JSON object per event
    Json,
    /// Single line per event
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// Logging configuration
#[derive(Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Level for workspace crates
    pub level: LogLevel,
    /// Replaces the generated crate directives (e.g. `"core_navbar=trace"`)
    pub filter: Option<String>,
    /// Host logger receiving a copy of every event
    pub logger_sink: Option<Arc<dyn LoggerSink>>,
    /// Emit advisory notices for unsupported platforms
    pub advisories: bool,
    pub enable_spans: bool,
    pub display_target: bool,
    pub display_thread_info: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
            filter: None,
            logger_sink: None,
            advisories: true,
            enable_spans: true,
            display_target: true,
            display_thread_info: false,
        }
    }
}

impl fmt::Debug for LoggingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingConfig")
            .field("format", &self.format)
            .field("level", &self.level)
            .field("filter", &self.filter)
            .field("logger_sink", &self.logger_sink.is_some())
            .field("advisories", &self.advisories)
            .field("enable_spans", &self.enable_spans)
            .finish_non_exhaustive()
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_logger_sink(mut self, sink: Arc<dyn LoggerSink>) -> Self {
        self.logger_sink = Some(sink);
        self
    }

    pub fn with_advisories(mut self, enabled: bool) -> Self {
        self.advisories = enabled;
        self
    }

    pub fn with_spans(mut self, enable: bool) -> Self {
        self.enable_spans = enable;
        self
    }

    pub fn with_target(mut self, display: bool) -> Self {
        self.display_target = display;
        self
    }

    pub fn with_thread_info(mut self, display: bool) -> Self {
        self.display_thread_info = display;
        self
    }

    /// Filter directives this configuration expands to.
    pub fn directives(&self) -> String {
        let mut directives = match &self.filter {
            Some(custom) => vec![custom.clone()],
            None => std::iter::once("warn".to_string())
                .chain(
                    WORKSPACE_CRATES
                        .iter()
                        .map(|krate| format!("{}={}", krate, self.level)),
                )
                .collect(),
        };

        let advisory_level = if self.advisories { "warn" } else { "off" };
        directives.push(format!("{}={}", ADVISORY_TARGET, advisory_level));
        directives.join(",")
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// [`Error::Config`] if the filter does not parse or a global subscriber is
/// already installed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer(&config))
        .with(HostLogLayer::new(config.logger_sink.clone()))
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_new(config.directives())
        .map_err(|e| Error::Config(format!("Invalid log filter: {}", e)))
}

fn fmt_layer<S>(config: &LoggingConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    let spans = if config.enable_spans {
        FmtSpan::ACTIVE
    } else {
        FmtSpan::NONE
    };
    let base = tracing_subscriber::fmt::layer()
        .with_target(config.display_target)
        .with_thread_ids(config.display_thread_info)
        .with_thread_names(config.display_thread_info)
        .with_writer(io::stdout);

    match config.format {
        LogFormat::Pretty => base.pretty().with_span_events(spans).boxed(),
        LogFormat::Compact => base.compact().boxed(),
        LogFormat::Json => base
            .json()
            .flatten_event(true)
            .with_current_span(config.enable_spans)
            .with_span_list(config.enable_spans)
            .boxed(),
    }
}

/// Forwards events to a host [`LoggerSink`].
///
/// Inside a tokio runtime the sink is awaited on a spawned task; outside one
/// it is driven to completion on the calling thread.
pub struct HostLogLayer {
    sink: Option<Arc<dyn LoggerSink>>,
}

impl HostLogLayer {
    pub fn new(sink: Option<Arc<dyn LoggerSink>>) -> Self {
        Self { sink }
    }
}

impl<S> Layer<S> for HostLogLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let Some(sink) = &self.sink else {
            return;
        };

        let metadata = event.metadata();
        let level = log_level(*metadata.level());
        if level < sink.min_level() {
            return;
        }

        let mut fields = FieldCollector::default();
        event.record(&mut fields);

        let message = fields
            .message
            .take()
            .unwrap_or_else(|| metadata.name().to_string());
        let mut entry = LogEntry::new(level, metadata.target(), message);
        entry.fields = fields.values;
        entry.span = ctx.lookup_current().map(|span| span.name().to_string());

        forward(Arc::clone(sink), entry);
    }
}

fn forward(sink: Arc<dyn LoggerSink>, entry: LogEntry) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                if let Err(err) = sink.log(entry).await {
                    eprintln!("host logger rejected entry: {}", err);
                }
            });
        }
        Err(_) => {
            if let Err(err) = futures::executor::block_on(sink.log(entry)) {
                eprintln!("host logger rejected entry: {}", err);
            }
        }
    }
}

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    values: BTreeMap<String, String>,
}

impl FieldCollector {
    fn insert(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = Some(value),
            name => {
                self.values.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, format!("{:?}", value));
    }
}

fn log_level(level: Level) -> LogLevel {
    match level {
        Level::TRACE => LogLevel::Trace,
        Level::DEBUG => LogLevel::Debug,
        Level::INFO => LogLevel::Info,
        Level::WARN => LogLevel::Warn,
        Level::ERROR => LogLevel::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as SinkResult;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        entries: Mutex<Vec<LogEntry>>,
        min_level: Option<LogLevel>,
    }

    #[async_trait]
    impl LoggerSink for RecordingSink {
        async fn log(&self, entry: LogEntry) -> SinkResult<()> {
            self.entries.lock().unwrap().push(entry);
            Ok(())
        }

        fn min_level(&self) -> LogLevel {
            self.min_level.unwrap_or(LogLevel::Trace)
        }
    }

    fn install(sink: Arc<RecordingSink>) -> tracing::subscriber::DefaultGuard {
        let sink: Arc<dyn LoggerSink> = sink;
        let subscriber = tracing_subscriber::registry().with(HostLogLayer::new(Some(sink)));
        tracing::subscriber::set_default(subscriber)
    }

    #[test]
    fn test_default_directives() {
        let directives = LoggingConfig::default()
            .with_level(LogLevel::Debug)
            .directives();

        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("core_navbar=debug"));
        assert!(directives.contains("core_runtime=debug"));
        assert!(directives.ends_with("navbar::advisory=warn"));
    }

    #[test]
    fn test_custom_filter_keeps_advisory_directive() {
        let directives = LoggingConfig::default()
            .with_filter("core_navbar=trace")
            .with_advisories(false)
            .directives();

        assert_eq!(directives, "core_navbar=trace,navbar::advisory=off");
        assert!(build_filter(&LoggingConfig::default().with_filter("core_navbar=trace")).is_ok());
    }

    #[test]
    fn test_build_filter_rejects_garbage() {
        let config = LoggingConfig::default().with_filter("core_navbar=notalevel");
        let err = build_filter(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid log filter"));
    }

    #[test]
    fn test_default_format_follows_build_profile() {
        let expected = if cfg!(debug_assertions) {
            LogFormat::Pretty
        } else {
            LogFormat::Json
        };
        assert_eq!(LogFormat::default(), expected);
    }

    #[test]
    fn test_host_layer_forwards_advisory() {
        let sink = Arc::new(RecordingSink::default());
        let _guard = install(sink.clone());

        tracing::warn!(
            target: ADVISORY_TARGET,
            operation = "getVisibilityAsync",
            attempts = 2u64,
            "only available on Android"
        );

        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert!(entry.is_advisory());
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.message, "only available on Android");
        assert_eq!(entry.fields["operation"], "getVisibilityAsync");
        assert_eq!(entry.fields["attempts"], "2");
        assert_eq!(entry.span, None);
    }

    #[test]
    fn test_host_layer_records_span_and_min_level() {
        let sink = Arc::new(RecordingSink {
            entries: Mutex::new(Vec::new()),
            min_level: Some(LogLevel::Info),
        });
        let _guard = install(sink.clone());

        let span = tracing::info_span!("apply_appearance");
        let _entered = span.enter();
        tracing::debug!("dropped");
        tracing::info!("kept");

        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "kept");
        assert_eq!(entries[0].span.as_deref(), Some("apply_appearance"));
    }

    #[test]
    fn test_config_debug_hides_sink() {
        let config =
            LoggingConfig::default().with_logger_sink(Arc::new(RecordingSink::default()));
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("logger_sink: true"));
    }
}

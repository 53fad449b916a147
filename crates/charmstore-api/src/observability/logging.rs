//! Log subscriber setup.
//!
//! `RUST_LOG` takes precedence over the configured level. JSON output puts
//! one object per line:
//!
//! ```json
//! {"timestamp":"...","level":"INFO","target":"charmstore::http","fields":{"message":"request completed","status":200}}
//! ```

use std::str::FromStr;

use charmstore_server::config::LoggingSettings;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

/// How log events are formatted and filtered.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// JSON lines instead of human-readable text.
    pub json_format: bool,
    /// Level used when `RUST_LOG` is unset.
    pub default_level: Level,
    /// Emit span enter/exit events.
    pub include_spans: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json_format: false,
            default_level: Level::INFO,
            include_spans: false,
        }
    }
}

impl LoggingConfig {
    pub fn json() -> Self {
        Self {
            json_format: true,
            ..Default::default()
        }
    }

    pub fn text() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    pub fn with_spans(mut self) -> Self {
        self.include_spans = true;
        self
    }

    /// Builds the logging setup from the `logging` configuration section.
    ///
    /// An unparseable level falls back to `INFO`; configuration validation
    /// rejects such values before this point.
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        let base = if settings.json {
            Self::json()
        } else {
            Self::text()
        };
        base.with_level(Level::from_str(&settings.level).unwrap_or(Level::INFO))
    }
}

/// Installs the global subscriber.
///
/// Only the first call takes effect.
pub fn init_logging(config: LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_level.to_string()));

    let span_events = if config.include_spans {
        FmtSpan::ENTER | FmtSpan::EXIT
    } else {
        FmtSpan::NONE
    };

    if config.json_format {
        let subscriber = tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .json()
                .with_span_events(span_events)
                .with_current_span(true)
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        );
        let _ = tracing::subscriber::set_global_default(subscriber);
    } else {
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_span_events(span_events).with_target(true));
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

/// Returns a JSON subscriber writing to `writer` at every level.
pub fn create_json_layer<W>(writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(EnvFilter::new("trace"))
        .with(
            fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(true)
                .with_current_span(true),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CaptureWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl CaptureWriter {
        fn output(&self) -> String {
            String::from_utf8_lossy(&self.buffer.lock().unwrap()).to_string()
        }
    }

    impl std::io::Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CaptureWriter {
        type Writer = CaptureWriter;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_from_settings() {
        let config = LoggingConfig::from_settings(&LoggingSettings {
            level: "debug".to_string(),
            json: true,
        });
        assert!(config.json_format);
        assert_eq!(config.default_level, Level::DEBUG);
        assert!(!config.include_spans);

        let config = LoggingConfig::from_settings(&LoggingSettings {
            level: "warn".to_string(),
            json: false,
        });
        assert!(!config.json_format);
        assert_eq!(config.default_level, Level::WARN);
    }

    #[test]
    fn test_builders() {
        let config = LoggingConfig::text().with_level(Level::TRACE).with_spans();
        assert_eq!(config.default_level, Level::TRACE);
        assert!(config.include_spans);
    }

    /// Test: JSON log lines carry level, target and fields
    #[test]
    fn test_json_lines() {
        let writer = CaptureWriter::default();
        let subscriber = create_json_layer(writer.clone());

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "charmstore::http", status = 200, "request completed");
        });

        let output = writer.output();
        let line = output.lines().find(|l| !l.is_empty()).expect("a log line");
        let json: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(json["level"], "INFO");
        assert_eq!(json["target"], "charmstore::http");
        assert_eq!(json["fields"]["status"], 200);
        assert_eq!(json["fields"]["message"], "request completed");
    }
}

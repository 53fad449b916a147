//! Structured logging setup.

mod logging;

pub use logging::{create_json_layer, init_logging, LoggingConfig};
